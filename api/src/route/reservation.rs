use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    request_cash_settlement, settle_electronic, show_my_reservations,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/me", get(show_my_reservations))
        .route("/:reservation_id/payments/electronic", post(settle_electronic))
        .route("/:reservation_id/payments/cash", post(request_cash_settlement));

    Router::new().nest("/reservations", routers)
}
