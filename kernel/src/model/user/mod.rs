use crate::model::{id::UserId, role::Role};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub is_member: bool,
}

/// 巡回・ゲート画面で予約に添える連絡先付きの所有者情報
#[derive(Debug, Clone)]
pub struct ReservationOwner {
    pub user_id: UserId,
    pub full_name: String,
    pub phone: String,
}
