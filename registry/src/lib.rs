use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::repository::slot::SlotRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::repository::auth::AuthRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::slot::SlotRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    user_repository: Arc<dyn UserRepository>,
    slot_repository: Arc<dyn SlotRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: &AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(pool.clone(), app_config.auth.ttl));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let slot_repository = Arc::new(SlotRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        Self {
            health_check_repository,
            auth_repository,
            user_repository,
            slot_repository,
            reservation_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn slot_repository(&self) -> Arc<dyn SlotRepository> {
        self.slot_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }
}
