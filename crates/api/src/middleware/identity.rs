//! # Identity Middleware
//!
//! Requests reach this service with identity verification already done by
//! an upstream provider; the verified, opaque identity string arrives in
//! the `x-identity` header. This module extracts that string and resolves
//! it to a registered member. No credential checking happens here, by
//! contract.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bandsync_core::errors::BandError;
use sqlx::PgPool;

use crate::middleware::error_handling::AppError;
use bandsync_db::models::DbMember;

/// Header carrying the verified external identity string.
pub const IDENTITY_HEADER: &str = "x-identity";

/// The authenticated identity of the current request.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError(BandError::Authentication(
                    "Missing identity header".to_string(),
                ))
            })?;

        Ok(Identity(identity.to_string()))
    }
}

/// Resolves the request identity to its member profile.
///
/// A verified identity that has never registered a profile is reported as
/// not-found; registration happens through `PUT /api/members/me`.
pub async fn current_member(pool: &PgPool, identity: &Identity) -> Result<DbMember, AppError> {
    let member = bandsync_db::repositories::member::get_member_by_identity(pool, &identity.0)
        .await
        .map_err(BandError::Database)?
        .ok_or_else(|| {
            BandError::NotFound("Member profile not found; register first".to_string())
        })?;

    Ok(member)
}
