use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// 利用者の役割。Guest は登録対象外で、料金区分としてのみ使う。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Staff,
    Guest,
}

/// 役割ごとに呼び出せる操作の一覧。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    BookSlot,
    ViewOwnHistory,
    SettleOwnReservation,
    PurchaseMembership,
    PatrolActive,
    ViewCashPending,
    ConfirmCashReceipt,
}

impl Role {
    pub fn permits(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            // Staff はゲート業務のみ。予約系の画面は持たない。
            Role::Staff => matches!(capability, PatrolActive | ViewCashPending | ConfirmCashReceipt),
            Role::Student | Role::Faculty | Role::Guest => matches!(
                capability,
                BookSlot | ViewOwnHistory | SettleOwnReservation | PurchaseMembership
            ),
        }
    }

}

/// Staff 登録を許可するメールドメイン。登録時のみ検査する。
pub const STAFF_EMAIL_DOMAIN: &str = "@bennett.edu.in";

pub fn staff_email_permitted(email: &str) -> bool {
    email.ends_with(STAFF_EMAIL_DOMAIN)
}
