use crate::models::DbGrid;
use bandsync_core::models::grid::{AvailabilityGrid, GridScope, ScheduleOwner};
use chrono::Utc;
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_grid(
    pool: &Pool<Postgres>,
    owner: ScheduleOwner,
    scope: GridScope,
) -> Result<Option<DbGrid>> {
    let grid = sqlx::query_as::<_, DbGrid>(
        r#"
        SELECT member_id, band_id, days, comment, updated_at
        FROM grids
        WHERE member_id = $1 AND band_id = $2
        "#,
    )
    .bind(owner.as_db_id())
    .bind(scope.as_db_id())
    .fetch_optional(pool)
    .await?;

    Ok(grid)
}

/// All grid rows scoped to a band: one per member who saved availability,
/// plus the group practice row when it exists.
pub async fn get_grids_by_band(pool: &Pool<Postgres>, band_id: Uuid) -> Result<Vec<DbGrid>> {
    let grids = sqlx::query_as::<_, DbGrid>(
        r#"
        SELECT member_id, band_id, days, comment, updated_at
        FROM grids
        WHERE band_id = $1
        "#,
    )
    .bind(band_id)
    .fetch_all(pool)
    .await?;

    Ok(grids)
}

/// All grid rows owned by a real member, across every scope.
pub async fn get_grids_by_member(pool: &Pool<Postgres>, member_id: Uuid) -> Result<Vec<DbGrid>> {
    let grids = sqlx::query_as::<_, DbGrid>(
        r#"
        SELECT member_id, band_id, days, comment, updated_at
        FROM grids
        WHERE member_id = $1
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;

    Ok(grids)
}

pub async fn upsert_grid(
    pool: &Pool<Postgres>,
    owner: ScheduleOwner,
    scope: GridScope,
    days: &AvailabilityGrid,
    comment: Option<&str>,
) -> Result<DbGrid> {
    let now = Utc::now();

    tracing::debug!(
        "Upserting grid: owner={:?}, scope={:?}, days={}",
        owner,
        scope,
        days.len()
    );

    let grid = sqlx::query_as::<_, DbGrid>(
        r#"
        INSERT INTO grids (member_id, band_id, days, comment, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (member_id, band_id) DO UPDATE
        SET days = EXCLUDED.days,
            comment = EXCLUDED.comment,
            updated_at = EXCLUDED.updated_at
        RETURNING member_id, band_id, days, comment, updated_at
        "#,
    )
    .bind(owner.as_db_id())
    .bind(scope.as_db_id())
    .bind(Json(days))
    .bind(comment)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(grid)
}

/// Deletes every grid owned by the member, across all scopes.
pub async fn delete_grids_by_member(pool: &Pool<Postgres>, member_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM grids
        WHERE member_id = $1
        "#,
    )
    .bind(member_id)
    .execute(pool)
    .await?;

    Ok(())
}
