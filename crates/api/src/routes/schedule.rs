use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/schedule", get(handlers::schedule::get_schedule))
        .route("/api/schedule", post(handlers::schedule::save_schedule))
        .route(
            "/api/schedule/default",
            get(handlers::schedule::get_default_schedule),
        )
}
