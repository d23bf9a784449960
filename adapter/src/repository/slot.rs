use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::SlotId,
    slot::{Slot, SlotWithOccupant, VehicleClass},
};
use kernel::repository::slot::SlotRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::slot::{SlotRow, SlotWithOccupantRow},
    ConnectionPool,
};

#[derive(new)]
pub struct SlotRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SlotRepository for SlotRepositoryImpl {
    async fn find_with_occupant_by_class(
        &self,
        vehicle_class: VehicleClass,
    ) -> AppResult<Vec<SlotWithOccupant>> {
        let rows: Vec<SlotWithOccupantRow> = sqlx::query_as(
            r#"
            SELECT
                ps.slot_id,
                ps.zone,
                ps.slot_number,
                ps.vehicle_class,
                ps.status,
                r.user_id AS occupant_id
            FROM parking_slots ps
            LEFT JOIN reservations r
                ON ps.slot_id = r.slot_id AND r.status = 'active'
            WHERE ps.vehicle_class = ?
            ORDER BY ps.zone, ps.slot_number
            "#,
        )
        .bind(vehicle_class)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(SlotWithOccupant::from).collect())
    }

    async fn find_by_id(&self, slot_id: SlotId) -> AppResult<Option<Slot>> {
        let row: Option<SlotRow> = sqlx::query_as(
            r#"
            SELECT slot_id, zone, slot_number, vehicle_class, status
            FROM parking_slots
            WHERE slot_id = ?
            "#,
        )
        .bind(slot_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Slot::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use kernel::model::slot::SlotStatus;

    #[tokio::test]
    async fn inventory_is_seeded_per_zone() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let repo = SlotRepositoryImpl::new(pool);

        let cars = repo
            .find_with_occupant_by_class(VehicleClass::Car)
            .await?;
        let bikes = repo
            .find_with_occupant_by_class(VehicleClass::Bike)
            .await?;

        assert_eq!(cars.len(), 30);
        assert_eq!(bikes.len(), 50);
        assert!(cars
            .iter()
            .all(|s| s.slot.status == SlotStatus::Available && s.occupant.is_none()));
        // ゾーン・枠番号順
        assert_eq!(cars[0].slot.zone, "A");
        assert_eq!(cars[0].slot.slot_number, 1);
        assert_eq!(cars[29].slot.zone, "B");
        assert_eq!(cars[29].slot.slot_number, 15);
        Ok(())
    }

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        crate::database::seed_parking_slots(&pool).await?;

        let repo = SlotRepositoryImpl::new(pool);
        let cars = repo
            .find_with_occupant_by_class(VehicleClass::Car)
            .await?;
        assert_eq!(cars.len(), 30);
        Ok(())
    }
}
