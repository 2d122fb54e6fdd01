//! # Band Handlers
//!
//! This module contains handlers for band lifecycle and membership, plus
//! the aggregate availability view band owners use to pick practice times.
//!
//! ## Aggregate View
//!
//! `GET /api/bands/:token` resolves the band by invite token and folds
//! every member's stored grid into a per-(date, hour) summary. It works by:
//!
//! 1. Loading the band's members in join order and every grid row scoped
//!    to the band in one query each
//! 2. Pairing each member with their grid (members without a grid
//!    contribute nothing; the group practice row is not a member and is
//!    excluded)
//! 3. Running the aggregation engine over the paired entries, which
//!    accumulates over all persisted dates
//! 4. Attaching the band's display window so the client can truncate
//!    rendering to the coordination period
//!
//! Holding a band's invite token is what grants access to this view; no
//! membership check is made, matching the join flow where the token is the
//! capability.

use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use bandsync_core::{
    aggregate::{aggregate, DisplayWindow},
    errors::BandError,
    models::band::{
        Band, BandSummary, CreateBandRequest, CreateBandResponse, DeleteBandResponse,
        GetBandResponse, JoinBandRequest, JoinBandResponse, LeaveBandResponse, ListBandsResponse,
        UpdateBandRequest, UpdateBandResponse,
    },
    models::grid::ScheduleOwner,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    middleware::{
        error_handling::AppError,
        identity::{current_member, Identity},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn create_band(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Json(payload): Json<CreateBandRequest>,
) -> Result<Json<CreateBandResponse>, AppError> {
    payload.validate()?;

    let member = current_member(&state.db_pool, &identity).await?;

    let band = bandsync_db::repositories::band::create_band(
        &state.db_pool,
        payload.name.trim(),
        payload.start_date,
        payload.end_date,
        payload.start_hour,
        payload.end_hour,
        member.id,
    )
    .await
    .map_err(BandError::Database)?;

    let band: Band = band.into();
    Ok(Json(CreateBandResponse {
        id: band.id,
        name: band.name,
        token: band.token,
        start_date: band.start_date,
        end_date: band.end_date,
        start_hour: band.start_hour,
        end_hour: band.end_hour,
        created_at: band.created_at,
    }))
}

#[axum::debug_handler]
pub async fn list_bands(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
) -> Result<Json<ListBandsResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;

    let bands = bandsync_db::repositories::band::list_bands_for_member(&state.db_pool, member.id)
        .await
        .map_err(BandError::Database)?;

    let mut summaries = Vec::with_capacity(bands.len());
    for band in bands {
        let members = bandsync_db::repositories::band::list_members(&state.db_pool, band.id)
            .await
            .map_err(BandError::Database)?;

        let band: Band = band.into();
        let is_owner = band.is_owned_by(member.id);
        summaries.push(BandSummary {
            id: band.id,
            name: band.name,
            token: band.token,
            start_date: band.start_date,
            end_date: band.end_date,
            start_hour: band.start_hour,
            end_hour: band.end_hour,
            is_owner,
            member_names: members.into_iter().map(|m| m.name).collect(),
        });
    }

    Ok(Json(ListBandsResponse { bands: summaries }))
}

#[axum::debug_handler]
pub async fn get_band(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Path(token): Path<String>,
) -> Result<Json<GetBandResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;
    let band = resolve_band_by_token(&state, &token).await?;

    // Members in join order; this is the contributor order in the summary.
    let members = bandsync_db::repositories::band::list_members(&state.db_pool, band.id)
        .await
        .map_err(BandError::Database)?;

    let grid_rows = bandsync_db::repositories::grid::get_grids_by_band(&state.db_pool, band.id)
        .await
        .map_err(BandError::Database)?;

    // Index grids by owning member, leaving out the group practice row.
    let mut grids_by_member = HashMap::new();
    for row in grid_rows {
        if let ScheduleOwner::Member(member_id) = row.owner() {
            grids_by_member.insert(member_id, row.into_grid());
        }
    }

    let entries = members.iter().filter_map(|m| {
        grids_by_member
            .get(&m.id)
            .map(|grid| (m.name.as_str(), grid))
    });
    let summary = aggregate(entries);

    let window = DisplayWindow::for_band(&band);
    let member_names: Vec<String> = members.into_iter().map(|m| m.name).collect();

    Ok(Json(GetBandResponse {
        id: band.id,
        name: band.name,
        token: band.token,
        start_date: band.start_date,
        end_date: band.end_date,
        start_hour: band.start_hour,
        end_hour: band.end_hour,
        is_owner: band.owner_id == member.id,
        total_members: member_names.len(),
        members: member_names,
        window,
        summary,
    }))
}

#[axum::debug_handler]
pub async fn join_band(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Json(payload): Json<JoinBandRequest>,
) -> Result<Json<JoinBandResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;
    let band = resolve_band_by_token(&state, &payload.token).await?;

    let outcome = bandsync_db::repositories::band::add_member(&state.db_pool, band.id, member.id)
        .await
        .map_err(BandError::Database)?;

    Ok(Json(JoinBandResponse {
        band_id: band.id,
        name: band.name,
        outcome,
    }))
}

#[axum::debug_handler]
pub async fn update_band(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Path(token): Path<String>,
    Json(payload): Json<UpdateBandRequest>,
) -> Result<Json<UpdateBandResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;
    let band = resolve_band_by_token(&state, &token).await?;

    if !band.is_owned_by(member.id) {
        return Err(AppError(BandError::PermissionDenied(
            "Only the band owner can edit the band".to_string(),
        )));
    }

    payload.validate()?;

    let updated = bandsync_db::repositories::band::update_band(
        &state.db_pool,
        band.id,
        payload.name.trim(),
        payload.start_date,
        payload.end_date,
        payload.start_hour,
        payload.end_hour,
    )
    .await
    .map_err(BandError::Database)?;

    Ok(Json(UpdateBandResponse {
        id: updated.id,
        updated_at: Utc::now(),
    }))
}

#[axum::debug_handler]
pub async fn leave_band(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Path(token): Path<String>,
) -> Result<Json<LeaveBandResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;
    let band = resolve_band_by_token(&state, &token).await?;

    // The owner's only way out is deleting the band.
    if band.is_owned_by(member.id) {
        return Err(AppError(BandError::PermissionDenied(
            "The band owner cannot leave; delete the band instead".to_string(),
        )));
    }

    let removed =
        bandsync_db::repositories::band::remove_member(&state.db_pool, band.id, member.id)
            .await
            .map_err(BandError::Database)?;

    if !removed {
        return Err(AppError(BandError::NotFound(
            "Not a member of this band".to_string(),
        )));
    }

    Ok(Json(LeaveBandResponse {
        band_id: band.id,
        name: band.name,
    }))
}

#[axum::debug_handler]
pub async fn delete_band(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Path(token): Path<String>,
) -> Result<Json<DeleteBandResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;
    let band = resolve_band_by_token(&state, &token).await?;

    if !band.is_owned_by(member.id) {
        return Err(AppError(BandError::PermissionDenied(
            "Only the band owner can delete the band".to_string(),
        )));
    }

    bandsync_db::repositories::band::delete_band(&state.db_pool, band.id)
        .await
        .map_err(BandError::Database)?;

    Ok(Json(DeleteBandResponse {
        id: band.id,
        name: band.name,
    }))
}

/// Looks up a band by invite token, mapping an unknown token to not-found.
pub(crate) async fn resolve_band_by_token(
    state: &ApiState,
    token: &str,
) -> Result<Band, AppError> {
    let band = bandsync_db::repositories::band::get_band_by_token(&state.db_pool, token)
        .await
        .map_err(BandError::Database)?
        .ok_or_else(|| BandError::NotFound("No band matches this token".to_string()))?;

    Ok(band.into())
}

/// Membership guard shared by the schedule and practice handlers.
pub(crate) async fn require_member(
    state: &ApiState,
    band_id: Uuid,
    member_id: Uuid,
) -> Result<(), AppError> {
    let is_member = bandsync_db::repositories::band::is_member(&state.db_pool, band_id, member_id)
        .await
        .map_err(BandError::Database)?;

    if !is_member {
        return Err(AppError(BandError::PermissionDenied(
            "Not a member of this band".to_string(),
        )));
    }
    Ok(())
}
