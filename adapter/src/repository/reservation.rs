use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{ReservationId, SlotId, UserId},
    reservation::{
        event::{ConfirmCashReceipt, CreateReservation, RequestCashSettlement, SettleElectronic},
        PaymentStatus, Reservation, ReservationStatus, ReservationWithOwner,
    },
};
use kernel::pricing;
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};
use sqlx::{Sqlite, Transaction};

use crate::database::{
    model::reservation::{ReservationRow, ReservationWithOwnerRow, SettlementRow},
    ConnectionPool,
};

const RESERVATION_COLUMNS: &str = r#"
    r.reservation_id,
    r.user_id,
    r.vehicle_number,
    r.reserved_at,
    r.duration_hours,
    r.fare,
    r.fine_amount,
    r.payment_method,
    r.payment_status,
    r.status,
    ps.slot_id,
    ps.zone,
    ps.slot_number,
    ps.vehicle_class
"#;

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

impl ReservationRepositoryImpl {
    // 精算対象の行をトランザクション内で読む
    async fn fetch_for_settlement(
        tx: &mut Transaction<'_, Sqlite>,
        reservation_id: ReservationId,
    ) -> AppResult<SettlementRow> {
        let row: Option<SettlementRow> = sqlx::query_as(
            r#"
            SELECT slot_id, reserved_at, duration_hours, payment_status, status
            FROM reservations
            WHERE reservation_id = ?
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{reservation_id}）が見つかりませんでした"))
        })
    }

    // 枠の解放。冪等で、元の状態によらず available に戻す。
    async fn release_slot(tx: &mut Transaction<'_, Sqlite>, slot_id: SlotId) -> AppResult<()> {
        sqlx::query("UPDATE parking_slots SET status = 'available' WHERE slot_id = ?")
            .bind(slot_id)
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut tx = self.db.begin().await?;

        // 先頭の条件付き UPDATE が枠の確保そのもの。同じ枠への同時予約は
        // 書き込みロックで直列化され、負けた側は 0 行更新になる。
        let claimed = sqlx::query(
            r#"
            UPDATE parking_slots
            SET status = 'occupied'
            WHERE slot_id = ? AND status = 'available'
            "#,
        )
        .bind(event.slot_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if claimed.rows_affected() == 0 {
            // 枠が存在しないのか、先に埋まったのかを区別して返す
            let exists: Option<(String, i32)> = sqlx::query_as(
                "SELECT zone, slot_number FROM parking_slots WHERE slot_id = ?",
            )
            .bind(event.slot_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            return Err(match exists {
                None => AppError::EntityNotFound(format!(
                    "枠（{}）が見つかりませんでした",
                    event.slot_id
                )),
                Some((zone, slot_number)) => {
                    AppError::SlotConflict(format!("枠（{zone}-{slot_number}）は既に利用中です"))
                }
            });
        }

        let reservation_id = ReservationId::new();
        sqlx::query(
            r#"
            INSERT INTO reservations
                (reservation_id, user_id, slot_id, vehicle_number, reserved_at, duration_hours, fare)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reservation_id)
        .bind(event.reserved_by)
        .bind(event.slot_id)
        .bind(&event.vehicle_number)
        .bind(event.reserved_at)
        .bind(event.duration_hours)
        .bind(event.fare)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(reservation_id)
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations r
            JOIN parking_slots ps ON r.slot_id = ps.slot_id
            WHERE r.reservation_id = ?
            "#
        ))
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Reservation::from).ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{reservation_id}）が見つかりませんでした"))
        })
    }

    async fn find_history_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations r
            JOIN parking_slots ps ON r.slot_id = ps.slot_id
            WHERE r.user_id = ?
            ORDER BY r.reserved_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_active_all(&self) -> AppResult<Vec<ReservationWithOwner>> {
        let rows: Vec<ReservationWithOwnerRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}, u.full_name, u.phone
            FROM reservations r
            JOIN parking_slots ps ON r.slot_id = ps.slot_id
            JOIN users u ON r.user_id = u.user_id
            WHERE r.status = 'active'
            ORDER BY ps.zone, ps.slot_number
            "#
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(ReservationWithOwner::from).collect())
    }

    async fn find_cash_pending_all(&self) -> AppResult<Vec<ReservationWithOwner>> {
        let rows: Vec<ReservationWithOwnerRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}, u.full_name, u.phone
            FROM reservations r
            JOIN parking_slots ps ON r.slot_id = ps.slot_id
            JOIN users u ON r.user_id = u.user_id
            WHERE r.payment_status = 'cash_pending'
            ORDER BY r.reserved_at
            "#
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(ReservationWithOwner::from).collect())
    }

    async fn settle_electronic(&self, event: SettleElectronic) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row = Self::fetch_for_settlement(&mut tx, event.reservation_id).await?;
        if row.status != ReservationStatus::Active {
            return Err(AppError::InvalidState(format!(
                "予約（{}）は既に完了しています",
                event.reservation_id
            )));
        }

        // 延滞金は精算時点で評価し直す。ここで書いた値が確定値になる。
        let fine = pricing::evaluate_fine(row.reserved_at, row.duration_hours, event.settled_at);

        let updated = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'completed',
                payment_status = 'paid',
                payment_method = 'upi',
                fine_amount = ?
            WHERE reservation_id = ? AND status = 'active'
            "#,
        )
        .bind(fine)
        .bind(event.reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NoRowsAffectedError(
                "settle_electronic".into(),
            ));
        }

        Self::release_slot(&mut tx, row.slot_id).await?;

        tx.commit().await.map_err(AppError::TransactionError)
    }

    async fn request_cash_settlement(&self, event: RequestCashSettlement) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row = Self::fetch_for_settlement(&mut tx, event.reservation_id).await?;
        if row.status != ReservationStatus::Active {
            return Err(AppError::InvalidState(format!(
                "予約（{}）は既に完了しています",
                event.reservation_id
            )));
        }

        let fine = pricing::evaluate_fine(row.reserved_at, row.duration_hours, event.requested_at);

        // 枠は解放しない。車両はまだ場内にいて、Staff の回収確認を待つ。
        let updated = sqlx::query(
            r#"
            UPDATE reservations
            SET payment_status = 'cash_pending',
                payment_method = 'cash',
                fine_amount = ?
            WHERE reservation_id = ? AND status = 'active'
            "#,
        )
        .bind(fine)
        .bind(event.reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NoRowsAffectedError(
                "request_cash_settlement".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)
    }

    async fn confirm_cash_receipt(&self, event: ConfirmCashReceipt) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row = Self::fetch_for_settlement(&mut tx, event.reservation_id).await?;
        if row.payment_status != PaymentStatus::CashPending {
            return Err(AppError::InvalidState(format!(
                "予約（{}）は現金回収待ちではありません",
                event.reservation_id
            )));
        }

        let updated = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'completed',
                payment_status = 'paid'
            WHERE reservation_id = ? AND payment_status = 'cash_pending'
            "#,
        )
        .bind(event.reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NoRowsAffectedError("confirm_cash_receipt".into()));
        }

        Self::release_slot(&mut tx, row.slot_id).await?;

        tx.commit().await.map_err(AppError::TransactionError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::slot::SlotRepositoryImpl;
    use crate::testing;
    use chrono::{Duration, Local};
    use kernel::model::reservation::PaymentMethod;
    use kernel::model::slot::{SlotStatus, VehicleClass};
    use kernel::repository::slot::SlotRepository;

    fn booking(
        user_id: UserId,
        slot_id: SlotId,
        reserved_at: chrono::DateTime<Local>,
        duration_hours: f64,
        fare: f64,
    ) -> CreateReservation {
        CreateReservation::new(
            user_id,
            slot_id,
            "UP16 AB 1234".into(),
            reserved_at,
            duration_hours,
            fare,
        )
    }

    #[tokio::test]
    async fn booking_occupies_the_slot() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Car).await;

        let repo = ReservationRepositoryImpl::new(pool.clone());
        let reservation_id = repo
            .create(booking(user.user_id, slot_id, Local::now(), 2.0, 40.0))
            .await?;

        let reservation = repo.find_by_id(reservation_id).await?;
        assert_eq!(reservation.status, ReservationStatus::Active);
        assert_eq!(reservation.payment_status, PaymentStatus::Unpaid);
        assert_eq!(reservation.payment_method, None);
        assert_eq!(reservation.fare, 40.0);
        assert_eq!(reservation.fine_amount, 0.0);
        assert_eq!(reservation.slot.slot_id, slot_id);

        let slots = SlotRepositoryImpl::new(pool)
            .find_with_occupant_by_class(VehicleClass::Car)
            .await?;
        let booked = slots.iter().find(|s| s.slot.slot_id == slot_id).unwrap();
        assert_eq!(booked.slot.status, SlotStatus::Occupied);
        assert_eq!(booked.occupant, Some(user.user_id));
        Ok(())
    }

    #[tokio::test]
    async fn booking_an_occupied_slot_is_a_conflict() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let other = testing::register_student(&pool, "vikram").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Car).await;

        let repo = ReservationRepositoryImpl::new(pool);
        repo.create(booking(user.user_id, slot_id, Local::now(), 1.0, 20.0))
            .await?;

        let res = repo
            .create(booking(other.user_id, slot_id, Local::now(), 1.0, 20.0))
            .await;
        assert!(matches!(res, Err(AppError::SlotConflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn booking_an_unknown_slot_is_not_found() {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;

        let repo = ReservationRepositoryImpl::new(pool);
        let res = repo
            .create(booking(user.user_id, SlotId::new(), Local::now(), 1.0, 20.0))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_bookings_have_exactly_one_winner() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let a = testing::register_student(&pool, "asha").await;
        let b = testing::register_student(&pool, "vikram").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Bike).await;

        let repo_a = ReservationRepositoryImpl::new(pool.clone());
        let repo_b = ReservationRepositoryImpl::new(pool.clone());
        let task_a = tokio::spawn(async move {
            repo_a
                .create(CreateReservation::new(
                    a.user_id,
                    slot_id,
                    "UP16 XX 0001".into(),
                    Local::now(),
                    1.0,
                    10.0,
                ))
                .await
        });
        let task_b = tokio::spawn(async move {
            repo_b
                .create(CreateReservation::new(
                    b.user_id,
                    slot_id,
                    "UP16 XX 0002".into(),
                    Local::now(),
                    1.0,
                    10.0,
                ))
                .await
        });

        let results = [task_a.await?, task_b.await?];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::SlotConflict(_))))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 1);
        Ok(())
    }

    #[tokio::test]
    async fn electronic_settlement_completes_and_releases() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Car).await;

        let repo = ReservationRepositoryImpl::new(pool.clone());
        let reservation_id = repo
            .create(booking(user.user_id, slot_id, Local::now(), 2.0, 40.0))
            .await?;

        repo.settle_electronic(SettleElectronic::new(reservation_id, Local::now()))
            .await?;

        let reservation = repo.find_by_id(reservation_id).await?;
        assert_eq!(reservation.status, ReservationStatus::Completed);
        assert_eq!(reservation.payment_status, PaymentStatus::Paid);
        assert_eq!(reservation.payment_method, Some(PaymentMethod::Upi));
        // 予定時間内の精算なので延滞金なし
        assert_eq!(reservation.fine_amount, 0.0);

        let slot = SlotRepositoryImpl::new(pool)
            .find_by_id(slot_id)
            .await?
            .unwrap();
        assert_eq!(slot.status, SlotStatus::Available);
        Ok(())
    }

    #[tokio::test]
    async fn overdue_settlement_records_the_flat_fine() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Car).await;

        let repo = ReservationRepositoryImpl::new(pool);
        // 5 時間前に開始した 2 時間の予約。猶予 45 分を超えている。
        let reserved_at = Local::now() - Duration::hours(5);
        let reservation_id = repo
            .create(booking(user.user_id, slot_id, reserved_at, 2.0, 40.0))
            .await?;

        repo.settle_electronic(SettleElectronic::new(reservation_id, Local::now()))
            .await?;

        let reservation = repo.find_by_id(reservation_id).await?;
        assert_eq!(reservation.fine_amount, pricing::FINE_AMOUNT);
        assert_eq!(reservation.fare, 40.0);
        Ok(())
    }

    #[tokio::test]
    async fn cash_flow_holds_the_slot_until_staff_confirms() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Car).await;

        let repo = ReservationRepositoryImpl::new(pool.clone());
        let reserved_at = Local::now() - Duration::hours(5);
        let reservation_id = repo
            .create(booking(user.user_id, slot_id, reserved_at, 2.0, 40.0))
            .await?;

        repo.request_cash_settlement(RequestCashSettlement::new(reservation_id, Local::now()))
            .await?;

        let reservation = repo.find_by_id(reservation_id).await?;
        assert_eq!(reservation.status, ReservationStatus::Active);
        assert_eq!(reservation.payment_status, PaymentStatus::CashPending);
        assert_eq!(reservation.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(reservation.fine_amount, pricing::FINE_AMOUNT);

        // ゲート画面に載り、枠はまだ埋まったまま
        let pending = repo.find_cash_pending_all().await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].reservation.reservation_id, reservation_id);
        assert_eq!(pending[0].owner.user_id, user.user_id);
        let slot_repo = SlotRepositoryImpl::new(pool);
        assert_eq!(
            slot_repo.find_by_id(slot_id).await?.unwrap().status,
            SlotStatus::Occupied
        );

        repo.confirm_cash_receipt(ConfirmCashReceipt::new(reservation_id, Local::now()))
            .await?;

        let reservation = repo.find_by_id(reservation_id).await?;
        assert_eq!(reservation.status, ReservationStatus::Completed);
        assert_eq!(reservation.payment_status, PaymentStatus::Paid);
        assert_eq!(
            slot_repo.find_by_id(slot_id).await?.unwrap().status,
            SlotStatus::Available
        );
        assert!(repo.find_cash_pending_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn settlement_is_one_way() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Car).await;

        let repo = ReservationRepositoryImpl::new(pool);
        let reservation_id = repo
            .create(booking(user.user_id, slot_id, Local::now(), 1.0, 20.0))
            .await?;
        repo.settle_electronic(SettleElectronic::new(reservation_id, Local::now()))
            .await?;

        // 完了後はどの精算操作も InvalidState
        let res = repo
            .settle_electronic(SettleElectronic::new(reservation_id, Local::now()))
            .await;
        assert!(matches!(res, Err(AppError::InvalidState(_))));
        let res = repo
            .request_cash_settlement(RequestCashSettlement::new(reservation_id, Local::now()))
            .await;
        assert!(matches!(res, Err(AppError::InvalidState(_))));
        let res = repo
            .confirm_cash_receipt(ConfirmCashReceipt::new(reservation_id, Local::now()))
            .await;
        assert!(matches!(res, Err(AppError::InvalidState(_))));
        Ok(())
    }

    #[tokio::test]
    async fn confirm_requires_a_cash_pending_reservation() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Car).await;

        let repo = ReservationRepositoryImpl::new(pool);
        let reservation_id = repo
            .create(booking(user.user_id, slot_id, Local::now(), 1.0, 20.0))
            .await?;

        let res = repo
            .confirm_cash_receipt(ConfirmCashReceipt::new(reservation_id, Local::now()))
            .await;
        assert!(matches!(res, Err(AppError::InvalidState(_))));
        Ok(())
    }

    #[tokio::test]
    async fn settling_an_unknown_reservation_is_not_found() {
        let pool = testing::setup_pool().await;
        let repo = ReservationRepositoryImpl::new(pool);

        let res = repo
            .settle_electronic(SettleElectronic::new(ReservationId::new(), Local::now()))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn history_is_most_recent_first() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let first = testing::first_available_slot(&pool, VehicleClass::Car).await;
        let second = testing::first_available_slot(&pool, VehicleClass::Bike).await;

        let repo = ReservationRepositoryImpl::new(pool);
        let earlier = Local::now() - Duration::hours(3);
        repo.create(booking(user.user_id, first, earlier, 1.0, 20.0))
            .await?;
        let latest = repo
            .create(booking(user.user_id, second, Local::now(), 1.0, 10.0))
            .await?;

        let history = repo.find_history_by_user_id(user.user_id).await?;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reservation_id, latest);
        Ok(())
    }

    #[tokio::test]
    async fn patrol_view_lists_active_reservations_with_contact() -> anyhow::Result<()> {
        let pool = testing::setup_pool().await;
        let user = testing::register_student(&pool, "asha").await;
        let slot_id = testing::first_available_slot(&pool, VehicleClass::Car).await;

        let repo = ReservationRepositoryImpl::new(pool);
        let reservation_id = repo
            .create(booking(user.user_id, slot_id, Local::now(), 2.0, 40.0))
            .await?;

        let active = repo.find_active_all().await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].reservation.reservation_id, reservation_id);
        assert_eq!(active[0].owner.full_name, "asha Test");
        assert_eq!(active[0].owner.phone, "9000000000");

        repo.settle_electronic(SettleElectronic::new(reservation_id, Local::now()))
            .await?;
        assert!(repo.find_active_all().await?.is_empty());
        Ok(())
    }
}
