use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/practice", get(handlers::practice::practice_overview))
        .route(
            "/api/bands/:token/practice",
            get(handlers::practice::get_practice),
        )
        .route(
            "/api/bands/:token/practice",
            put(handlers::practice::save_practice),
        )
}
