use axum::{
    routing::{delete, get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/members/me", get(handlers::member::get_me))
        .route("/api/members/me", put(handlers::member::register_member))
        .route(
            "/api/members/me/grids",
            delete(handlers::member::delete_my_grids),
        )
}
