use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::id::{SlotId, UserId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Car,
    Bike,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Occupied,
}

/// 駐車枠。初期化時に一括投入され、以後は状態のみ遷移する。
#[derive(Debug, Clone)]
pub struct Slot {
    pub slot_id: SlotId,
    pub zone: String,
    pub slot_number: i32,
    pub vehicle_class: VehicleClass,
    pub status: SlotStatus,
}

/// 空き状況一覧の 1 行。occupant は有効な予約の所有者。
#[derive(Debug, Clone)]
pub struct SlotWithOccupant {
    pub slot: Slot,
    pub occupant: Option<UserId>,
}
