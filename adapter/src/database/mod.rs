use std::time::Duration;

use kernel::model::{id::SlotId, slot::VehicleClass};
use shared::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};

pub mod model;

#[derive(Clone)]
pub struct ConnectionPool(SqlitePool);

impl ConnectionPool {
    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    pub fn inner_ref(&self) -> &SqlitePool {
        &self.0
    }

    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Sqlite>> {
        self.0.begin().await.map_err(AppError::TransactionError)
    }
}

fn make_connect_options(cfg: &DatabaseConfig) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(&cfg.filename)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
}

pub fn connect_database_with(cfg: &DatabaseConfig) -> ConnectionPool {
    ConnectionPool(SqlitePool::connect_lazy_with(make_connect_options(cfg)))
}

pub async fn migrate(pool: &ConnectionPool) -> AppResult<()> {
    sqlx::migrate!("../migrations")
        .run(pool.inner_ref())
        .await
        .map_err(|e| AppError::SpecificOperationError(sqlx::Error::Migrate(Box::new(e))))
}

// ゾーン構成は固定（四輪 A/B 各 15、二輪 C/D 各 25）
const ZONE_LAYOUT: [(&str, VehicleClass, i32); 4] = [
    ("A", VehicleClass::Car, 15),
    ("B", VehicleClass::Car, 15),
    ("C", VehicleClass::Bike, 25),
    ("D", VehicleClass::Bike, 25),
];

/// 駐車枠インベントリの初期投入。テーブルが空のときだけ実行される。
pub async fn seed_parking_slots(pool: &ConnectionPool) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parking_slots")
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
    if count > 0 {
        return Ok(());
    }

    for (zone, vehicle_class, size) in ZONE_LAYOUT {
        for slot_number in 1..=size {
            sqlx::query(
                r#"
                INSERT INTO parking_slots (slot_id, zone, slot_number, vehicle_class)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(SlotId::new())
            .bind(zone)
            .bind(slot_number)
            .bind(vehicle_class)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }
    }

    tx.commit().await.map_err(AppError::TransactionError)
}
