use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bands", post(handlers::band::create_band))
        .route("/api/bands", get(handlers::band::list_bands))
        .route("/api/bands/join", post(handlers::band::join_band))
        .route("/api/bands/:token", get(handlers::band::get_band))
        .route("/api/bands/:token", put(handlers::band::update_band))
        .route("/api/bands/:token", delete(handlers::band::delete_band))
        .route("/api/bands/:token/leave", post(handlers::band::leave_band))
}
