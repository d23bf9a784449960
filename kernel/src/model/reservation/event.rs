use chrono::{DateTime, Local};
use derive_new::new;

use crate::model::id::{ReservationId, SlotId, UserId};

#[derive(new)]
pub struct CreateReservation {
    pub reserved_by: UserId,
    pub slot_id: SlotId,
    pub vehicle_number: String,
    pub reserved_at: DateTime<Local>,
    pub duration_hours: f64,
    pub fare: f64,
}

/// 電子決済（UPI 相当）による即時精算
#[derive(new)]
pub struct SettleElectronic {
    pub reservation_id: ReservationId,
    pub settled_at: DateTime<Local>,
}

/// 出口ゲートでの現金精算の申請。Staff の回収確認までは確定しない。
#[derive(new)]
pub struct RequestCashSettlement {
    pub reservation_id: ReservationId,
    pub requested_at: DateTime<Local>,
}

#[derive(new)]
pub struct ConfirmCashReceipt {
    pub reservation_id: ReservationId,
    pub confirmed_at: DateTime<Local>,
}
