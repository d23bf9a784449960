use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::{reservation::reserve_slot, slot::show_slot_list};

pub fn build_slot_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/", get(show_slot_list))
        .route("/:slot_id/reservations", post(reserve_slot));

    Router::new().nest("/slots", routers)
}
