use kernel::model::{
    id::{SlotId, UserId},
    slot::{Slot, SlotStatus, SlotWithOccupant, VehicleClass},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotListQuery {
    pub class: VehicleClass,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub items: Vec<SlotResponse>,
}

impl From<Vec<SlotWithOccupant>> for SlotsResponse {
    fn from(value: Vec<SlotWithOccupant>) -> Self {
        Self {
            items: value.into_iter().map(SlotResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotResponse {
    pub slot_id: SlotId,
    pub zone: String,
    pub slot_number: i32,
    pub vehicle_class: VehicleClass,
    pub status: SlotStatus,
    // 利用中の場合のみ、その予約の所有者
    pub occupant_id: Option<UserId>,
}

impl From<SlotWithOccupant> for SlotResponse {
    fn from(value: SlotWithOccupant) -> Self {
        let SlotWithOccupant {
            slot:
                Slot {
                    slot_id,
                    zone,
                    slot_number,
                    vehicle_class,
                    status,
                },
            occupant,
        } = value;
        Self {
            slot_id,
            zone,
            slot_number,
            vehicle_class,
            status,
            occupant_id: occupant,
        }
    }
}
