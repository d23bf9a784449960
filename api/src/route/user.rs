use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{get_current_user, purchase_membership, register_user};

pub fn build_user_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/", post(register_user))
        .route("/me", get(get_current_user))
        .route("/me/membership", post(purchase_membership));

    Router::new().nest("/users", routers)
}
