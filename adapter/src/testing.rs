//! テスト専用のセットアップ補助。インメモリ DB にマイグレーションと
//! 固定インベントリを適用した状態で各テストに渡す。

use kernel::model::{
    id::SlotId,
    role::Role,
    slot::{SlotStatus, VehicleClass},
    user::{event::CreateUser, User},
};
use kernel::repository::{slot::SlotRepository, user::UserRepository};
use sqlx::sqlite::SqlitePoolOptions;

use crate::database::{seed_parking_slots, ConnectionPool};
use crate::repository::{slot::SlotRepositoryImpl, user::UserRepositoryImpl};

pub(crate) async fn setup_pool() -> ConnectionPool {
    // 接続ごとに別のインメモリ DB になるため、コネクションは 1 本に固定する
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect to in-memory database");
    sqlx::migrate!("../migrations")
        .run(&pool)
        .await
        .expect("apply migrations");

    let pool = ConnectionPool::new(pool);
    seed_parking_slots(&pool).await.expect("seed inventory");
    pool
}

pub(crate) async fn register_student(pool: &ConnectionPool, user_name: &str) -> User {
    let repo = UserRepositoryImpl::new(pool.clone());
    repo.create(CreateUser::new(
        user_name.into(),
        "secret".into(),
        format!("{user_name} Test"),
        format!("{user_name}@example.com"),
        "9000000000".into(),
        Role::Student,
    ))
    .await
    .expect("register user")
}

pub(crate) async fn first_available_slot(
    pool: &ConnectionPool,
    vehicle_class: VehicleClass,
) -> SlotId {
    let repo = SlotRepositoryImpl::new(pool.clone());
    repo.find_with_occupant_by_class(vehicle_class)
        .await
        .expect("list slots")
        .into_iter()
        .find(|s| s.slot.status == SlotStatus::Available)
        .expect("an available slot")
        .slot
        .slot_id
}
