use kernel::model::{
    id::{SlotId, UserId},
    slot::{Slot, SlotStatus, SlotWithOccupant, VehicleClass},
};

#[derive(sqlx::FromRow)]
pub struct SlotRow {
    pub slot_id: SlotId,
    pub zone: String,
    pub slot_number: i32,
    pub vehicle_class: VehicleClass,
    pub status: SlotStatus,
}

impl From<SlotRow> for Slot {
    fn from(value: SlotRow) -> Self {
        let SlotRow {
            slot_id,
            zone,
            slot_number,
            vehicle_class,
            status,
        } = value;
        Slot {
            slot_id,
            zone,
            slot_number,
            vehicle_class,
            status,
        }
    }
}

// 空き状況一覧に使う型。枠が利用中の場合のみ occupant_id が値を持つ。
#[derive(sqlx::FromRow)]
pub struct SlotWithOccupantRow {
    pub slot_id: SlotId,
    pub zone: String,
    pub slot_number: i32,
    pub vehicle_class: VehicleClass,
    pub status: SlotStatus,
    pub occupant_id: Option<UserId>,
}

impl From<SlotWithOccupantRow> for SlotWithOccupant {
    fn from(value: SlotWithOccupantRow) -> Self {
        let SlotWithOccupantRow {
            slot_id,
            zone,
            slot_number,
            vehicle_class,
            status,
            occupant_id,
        } = value;
        SlotWithOccupant {
            slot: Slot {
                slot_id,
                zone,
                slot_number,
                vehicle_class,
                status,
            },
            occupant: occupant_id,
        }
    }
}
