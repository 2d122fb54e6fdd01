use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use bandsync_core::{
    aggregate::DisplayWindow,
    errors::BandError,
    models::band::Band,
    models::grid::{
        AvailabilityGrid, GetDefaultScheduleResponse, GetScheduleResponse, GridScope,
        SaveScheduleRequest, SaveScheduleResponse, ScheduleOwner,
    },
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    handlers::band::require_member,
    middleware::{
        error_handling::AppError,
        identity::{current_member, Identity},
    },
    ApiState,
};

/// Query parameters for the personal schedule view. Without `band_id` the
/// default grid is shown.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub band_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<GetScheduleResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;

    let bands: Vec<Band> =
        bandsync_db::repositories::band::list_bands_for_member(&state.db_pool, member.id)
            .await
            .map_err(BandError::Database)?
            .into_iter()
            .map(Into::into)
            .collect();

    // The band view is limited to that band's window; the default view
    // spans every band the member is in, or two weeks when bandless.
    let window = match query.band_id {
        Some(band_id) => {
            let band = bands
                .iter()
                .find(|band| band.id == band_id)
                .ok_or_else(|| {
                    BandError::PermissionDenied("Not a member of this band".to_string())
                })?;
            DisplayWindow::for_band(band)
        }
        None => DisplayWindow::spanning(&bands)
            .unwrap_or_else(|| DisplayWindow::fallback(Utc::now().date_naive())),
    };

    let scope = GridScope::from(query.band_id);
    let grids = bandsync_db::repositories::grid::get_grids_by_member(&state.db_pool, member.id)
        .await
        .map_err(BandError::Database)?;

    let (days, comment) = grids
        .into_iter()
        .find(|row| row.scope() == scope)
        .map(|row| (row.days.0, row.comment))
        .unwrap_or((AvailabilityGrid::new(), None));

    Ok(Json(GetScheduleResponse {
        band_id: query.band_id,
        window,
        days,
        comment,
    }))
}

#[axum::debug_handler]
pub async fn save_schedule(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Json(payload): Json<SaveScheduleRequest>,
) -> Result<Json<SaveScheduleResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;

    if let Some(band_id) = payload.band_id {
        require_member(&state, band_id, member.id).await?;
    }

    let mut days = payload.days;
    days.prune();

    let row = bandsync_db::repositories::grid::upsert_grid(
        &state.db_pool,
        ScheduleOwner::Member(member.id),
        GridScope::from(payload.band_id),
        &days,
        payload.comment.as_deref(),
    )
    .await
    .map_err(BandError::Database)?;

    Ok(Json(SaveScheduleResponse {
        band_id: payload.band_id,
        updated_at: row.updated_at,
    }))
}

/// Returns the member's default grid, used by clients to prefill a band
/// schedule ("apply default").
#[axum::debug_handler]
pub async fn get_default_schedule(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
) -> Result<Json<GetDefaultScheduleResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;

    let days = bandsync_db::repositories::grid::get_grid(
        &state.db_pool,
        ScheduleOwner::Member(member.id),
        GridScope::Default,
    )
    .await
    .map_err(BandError::Database)?
    .map(|row| row.into_grid())
    .unwrap_or_default();

    Ok(Json(GetDefaultScheduleResponse { days }))
}
