use axum::Router;
use registry::AppRegistry;

use super::{
    auth::build_auth_routers, gate::build_gate_routers, health::build_health_check_routers,
    reservation::build_reservation_routers, slot::build_slot_routers, user::build_user_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_user_routers())
        .merge(build_slot_routers())
        .merge(build_reservation_routers())
        .merge(build_gate_routers());
    Router::new().nest("/api/v1", router)
}
