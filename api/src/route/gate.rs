use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::gate::{confirm_cash_receipt, show_cash_pending, show_patrol};

pub fn build_gate_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/patrol", get(show_patrol))
        .route("/cash-pending", get(show_cash_pending))
        .route(
            "/reservations/:reservation_id/confirm-cash",
            post(confirm_cash_receipt),
        );

    Router::new().nest("/gate", routers)
}
