use chrono::{DateTime, Local};
use garde::Validate;
use kernel::model::{
    id::{ReservationId, SlotId},
    reservation::{PaymentMethod, PaymentStatus, Reservation, ReservationStatus},
    slot::VehicleClass,
};
use kernel::pricing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(length(min = 1))]
    pub vehicle_number: String,
    // 正値チェックは料金計算側で行う
    #[garde(skip)]
    pub duration_hours: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreatedResponse {
    pub reservation_id: ReservationId,
    pub fare: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub slot_id: SlotId,
    pub slot_label: String,
    pub vehicle_class: VehicleClass,
    pub vehicle_number: String,
    pub reserved_at: DateTime<Local>,
    pub duration_hours: f64,
    pub planned_end_time: DateTime<Local>,
    pub fare: f64,
    /// 表示用の延滞金。精算済みなら確定値、精算前なら現時点での評価値。
    pub fine_due: f64,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub status: ReservationStatus,
}

impl ReservationResponse {
    pub fn evaluated_at(value: Reservation, now: DateTime<Local>) -> Self {
        let planned_end_time = pricing::planned_end(value.reserved_at, value.duration_hours);
        // 精算評価が済んだものは保存値、未精算のものは今この瞬間の評価を見せる
        let fine_due = match (value.status, value.payment_status) {
            (ReservationStatus::Active, PaymentStatus::Unpaid) => {
                pricing::evaluate_fine(value.reserved_at, value.duration_hours, now)
            }
            _ => value.fine_amount,
        };
        Self {
            reservation_id: value.reservation_id,
            slot_id: value.slot.slot_id,
            slot_label: value.slot.label(),
            vehicle_class: value.slot.vehicle_class,
            vehicle_number: value.vehicle_number,
            reserved_at: value.reserved_at,
            duration_hours: value.duration_hours,
            planned_end_time,
            fare: value.fare,
            fine_due,
            payment_method: value.payment_method,
            payment_status: value.payment_status,
            status: value.status,
        }
    }
}
