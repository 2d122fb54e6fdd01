use axum::{extract::State, Json};
use std::sync::Arc;

use bandsync_core::{
    errors::BandError,
    models::member::{DeleteGridsResponse, MemberResponse, RegisterMemberRequest},
};

use crate::{
    middleware::{
        error_handling::AppError,
        identity::{current_member, Identity},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn register_member(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
    Json(payload): Json<RegisterMemberRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    payload.validate()?;

    let member = bandsync_db::repositories::member::upsert_member(
        &state.db_pool,
        &identity.0,
        payload.name.trim(),
    )
    .await
    .map_err(BandError::Database)?;

    Ok(Json(MemberResponse {
        id: member.id,
        identity: member.identity,
        name: member.name,
        created_at: member.created_at,
    }))
}

#[axum::debug_handler]
pub async fn get_me(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
) -> Result<Json<MemberResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;

    Ok(Json(MemberResponse {
        id: member.id,
        identity: member.identity,
        name: member.name,
        created_at: member.created_at,
    }))
}

#[axum::debug_handler]
pub async fn delete_my_grids(
    State(state): State<Arc<ApiState>>,
    identity: Identity,
) -> Result<Json<DeleteGridsResponse>, AppError> {
    let member = current_member(&state.db_pool, &identity).await?;

    bandsync_db::repositories::grid::delete_grids_by_member(&state.db_pool, member.id)
        .await
        .map_err(BandError::Database)?;

    Ok(Json(DeleteGridsResponse {
        member_id: member.id,
        deleted: true,
    }))
}
