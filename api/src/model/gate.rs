use chrono::{DateTime, Local};
use kernel::model::{
    id::ReservationId,
    reservation::{PaymentStatus, ReservationWithOwner},
};
use kernel::pricing;
use serde::Serialize;

/// 巡回画面の 1 行。残り時間と延滞金の適用可否は表示時点で評価する。
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatrolEntryResponse {
    pub reservation_id: ReservationId,
    pub vehicle_number: String,
    pub slot_label: String,
    pub owner_name: String,
    pub phone: String,
    pub reserved_at: DateTime<Local>,
    pub planned_end_time: DateTime<Local>,
    pub minutes_remaining: i64,
    pub fine_applicable: bool,
    pub payment_status: PaymentStatus,
}

impl PatrolEntryResponse {
    pub fn evaluated_at(value: ReservationWithOwner, now: DateTime<Local>) -> Self {
        let ReservationWithOwner { reservation, owner } = value;
        let planned_end_time =
            pricing::planned_end(reservation.reserved_at, reservation.duration_hours);
        let fine_applicable =
            pricing::evaluate_fine(reservation.reserved_at, reservation.duration_hours, now) > 0.0;
        Self {
            reservation_id: reservation.reservation_id,
            vehicle_number: reservation.vehicle_number,
            slot_label: reservation.slot.label(),
            owner_name: owner.full_name,
            phone: owner.phone,
            reserved_at: reservation.reserved_at,
            planned_end_time,
            minutes_remaining: pricing::minutes_remaining(
                reservation.reserved_at,
                reservation.duration_hours,
                now,
            ),
            fine_applicable,
            payment_status: reservation.payment_status,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatrolResponse {
    pub items: Vec<PatrolEntryResponse>,
}

/// ゲート画面の 1 行。回収額は申請時に確定した保存値を使う。
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashPendingEntryResponse {
    pub reservation_id: ReservationId,
    pub vehicle_number: String,
    pub slot_label: String,
    pub owner_name: String,
    pub fare: f64,
    pub fine_amount: f64,
    pub total_due: f64,
}

impl From<ReservationWithOwner> for CashPendingEntryResponse {
    fn from(value: ReservationWithOwner) -> Self {
        let ReservationWithOwner { reservation, owner } = value;
        Self {
            reservation_id: reservation.reservation_id,
            vehicle_number: reservation.vehicle_number,
            slot_label: reservation.slot.label(),
            owner_name: owner.full_name,
            fare: reservation.fare,
            fine_amount: reservation.fine_amount,
            total_due: reservation.fare + reservation.fine_amount,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashPendingResponse {
    pub items: Vec<CashPendingEntryResponse>,
}
