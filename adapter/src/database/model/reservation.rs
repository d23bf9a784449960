use chrono::{DateTime, Local};
use kernel::model::{
    id::{ReservationId, SlotId, UserId},
    reservation::{
        PaymentMethod, PaymentStatus, Reservation, ReservationSlot, ReservationStatus,
        ReservationWithOwner,
    },
    slot::VehicleClass,
    user::ReservationOwner,
};

// 予約一覧・詳細の取得に使う型。枠情報を JOIN して埋める。
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub vehicle_number: String,
    pub reserved_at: DateTime<Local>,
    pub duration_hours: f64,
    pub fare: f64,
    pub fine_amount: f64,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub status: ReservationStatus,
    pub slot_id: SlotId,
    pub zone: String,
    pub slot_number: i32,
    pub vehicle_class: VehicleClass,
}

impl From<ReservationRow> for Reservation {
    fn from(value: ReservationRow) -> Self {
        let ReservationRow {
            reservation_id,
            user_id,
            vehicle_number,
            reserved_at,
            duration_hours,
            fare,
            fine_amount,
            payment_method,
            payment_status,
            status,
            slot_id,
            zone,
            slot_number,
            vehicle_class,
        } = value;
        Reservation {
            reservation_id,
            reserved_by: user_id,
            vehicle_number,
            reserved_at,
            duration_hours,
            fare,
            fine_amount,
            payment_method,
            payment_status,
            status,
            slot: ReservationSlot {
                slot_id,
                zone,
                slot_number,
                vehicle_class,
            },
        }
    }
}

// Staff 画面（巡回・ゲート）用。所有者の連絡先まで JOIN する。
#[derive(sqlx::FromRow)]
pub struct ReservationWithOwnerRow {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub vehicle_number: String,
    pub reserved_at: DateTime<Local>,
    pub duration_hours: f64,
    pub fare: f64,
    pub fine_amount: f64,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub status: ReservationStatus,
    pub slot_id: SlotId,
    pub zone: String,
    pub slot_number: i32,
    pub vehicle_class: VehicleClass,
    pub full_name: String,
    pub phone: String,
}

impl From<ReservationWithOwnerRow> for ReservationWithOwner {
    fn from(value: ReservationWithOwnerRow) -> Self {
        let ReservationWithOwnerRow {
            reservation_id,
            user_id,
            vehicle_number,
            reserved_at,
            duration_hours,
            fare,
            fine_amount,
            payment_method,
            payment_status,
            status,
            slot_id,
            zone,
            slot_number,
            vehicle_class,
            full_name,
            phone,
        } = value;
        ReservationWithOwner {
            reservation: Reservation {
                reservation_id,
                reserved_by: user_id,
                vehicle_number,
                reserved_at,
                duration_hours,
                fare,
                fine_amount,
                payment_method,
                payment_status,
                status,
                slot: ReservationSlot {
                    slot_id,
                    zone,
                    slot_number,
                    vehicle_class,
                },
            },
            owner: ReservationOwner {
                user_id,
                full_name,
                phone,
            },
        }
    }
}

// 精算時にトランザクション内で読む最小限の型
#[derive(sqlx::FromRow)]
pub struct SettlementRow {
    pub slot_id: SlotId,
    pub reserved_at: DateTime<Local>,
    pub duration_hours: f64,
    pub payment_status: PaymentStatus,
    pub status: ReservationStatus,
}
