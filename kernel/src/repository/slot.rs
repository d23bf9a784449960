use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::SlotId,
    slot::{Slot, SlotWithOccupant, VehicleClass},
};

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// 車種別の枠一覧。ゾーン・枠番号順で、有効な予約の所有者を添える。
    async fn find_with_occupant_by_class(
        &self,
        vehicle_class: VehicleClass,
    ) -> AppResult<Vec<SlotWithOccupant>>;
    async fn find_by_id(&self, slot_id: SlotId) -> AppResult<Option<Slot>>;
}
