use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use bandsync_core::{
    aggregate::DisplayWindow,
    errors::BandError,
    models::band::{
        Band, GetPracticeResponse, PracticeBandView, PracticeOverviewResponse,
        SavePracticeRequest, SavePracticeResponse,
    },
    models::grid::{GridScope, ScheduleOwner},
};
use chrono::Utc;

use crate::{
    handlers::band::{require_member, resolve_band_by_token},
    middleware::{
        error_handling::AppError,
        identity::{current_member, Identity},
    },
    ApiState,
};

/// Display colors assigned to bands in the overview, cycled in band-list
/// order.
const PRACTICE_COLORS: [&str; 8] = [
    "#ffadad", "#a5dfff", "#b6ffbc", "#ffe3bf", "#a79bff", "#ffa0b6", "#bdb2ff", "#ffc6ff",
];

/// The cross-band view: every band's practice grid over a window spanning
/// all of the member's bands.
#[axum::debug_handler]
pub async fn practice_overview(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
) -> Result<Json<PracticeOverviewResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;

    let bands: Vec<Band> =
        bandsync_db::repositories::band::list_bands_for_member(&state.db_pool, member.id)
            .await
            .map_err(BandError::Database)?
            .into_iter()
            .map(Into::into)
            .collect();

    let window = DisplayWindow::spanning(&bands)
        .unwrap_or_else(|| DisplayWindow::fallback(Utc::now().date_naive()));

    let mut views = Vec::with_capacity(bands.len());
    for (index, band) in bands.into_iter().enumerate() {
        let days = bandsync_db::repositories::grid::get_grid(
            &state.db_pool,
            ScheduleOwner::GroupDefault,
            GridScope::Band(band.id),
        )
        .await
        .map_err(BandError::Database)?
        .map(|row| row.into_grid())
        .unwrap_or_default();

        views.push(PracticeBandView {
            band_id: band.id,
            name: band.name,
            color: PRACTICE_COLORS[index % PRACTICE_COLORS.len()].to_string(),
            days,
        });
    }

    Ok(Json(PracticeOverviewResponse {
        window,
        bands: views,
    }))
}

#[axum::debug_handler]
pub async fn get_practice(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Path(token): Path<String>,
) -> Result<Json<GetPracticeResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;
    let band = resolve_band_by_token(&state, &token).await?;

    require_member(&state, band.id, member.id).await?;

    let days = bandsync_db::repositories::grid::get_grid(
        &state.db_pool,
        ScheduleOwner::GroupDefault,
        GridScope::Band(band.id),
    )
    .await
    .map_err(BandError::Database)?
    .map(|row| row.into_grid())
    .unwrap_or_default();

    Ok(Json(GetPracticeResponse {
        band_id: band.id,
        window: DisplayWindow::for_band(&band),
        days,
    }))
}

/// Saves the band's practice-session grid. Any member may set practice
/// times, not just the owner.
#[axum::debug_handler]
pub async fn save_practice(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Path(token): Path<String>,
    Json(payload): Json<SavePracticeRequest>,
) -> Result<Json<SavePracticeResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;
    let band = resolve_band_by_token(&state, &token).await?;

    require_member(&state, band.id, member.id).await?;

    let mut days = payload.days;
    days.prune();

    let row = bandsync_db::repositories::grid::upsert_grid(
        &state.db_pool,
        ScheduleOwner::GroupDefault,
        GridScope::Band(band.id),
        &days,
        None,
    )
    .await
    .map_err(BandError::Database)?;

    Ok(Json(SavePracticeResponse {
        band_id: band.id,
        updated_at: row.updated_at,
    }))
}
