use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{
    id::{ReservationId, SlotId, UserId},
    slot::VehicleClass,
    user::ReservationOwner,
};

pub mod event;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Cash,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    // 出口ゲートで Staff の現金回収を待っている状態。枠は解放しない。
    CashPending,
    Paid,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub reserved_by: UserId,
    pub vehicle_number: String,
    pub reserved_at: DateTime<Local>,
    pub duration_hours: f64,
    pub fare: f64,
    pub fine_amount: f64,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub status: ReservationStatus,
    pub slot: ReservationSlot,
}

#[derive(Debug, Clone)]
pub struct ReservationSlot {
    pub slot_id: SlotId,
    pub zone: String,
    pub slot_number: i32,
    pub vehicle_class: VehicleClass,
}

impl ReservationSlot {
    /// 画面表示用の枠ラベル（例: A-7）
    pub fn label(&self) -> String {
        format!("{}-{}", self.zone, self.slot_number)
    }
}

/// Staff 向け射影。予約に所有者の連絡先を添える。
#[derive(Debug, Clone)]
pub struct ReservationWithOwner {
    pub reservation: Reservation,
    pub owner: ReservationOwner,
}
