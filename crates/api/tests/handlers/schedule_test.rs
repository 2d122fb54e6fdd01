use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use bandsync_api::middleware::error_handling::AppError;
use bandsync_core::{
    errors::BandError,
    models::grid::{AvailabilityGrid, DaySlots, GridScope, ScheduleOwner},
};
use bandsync_db::models::DbGrid;

use crate::test_utils::TestContext;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Wrapper mirroring the save handler: membership gate for band scope,
// empty days pruned before the upsert
async fn save_schedule_wrapper(
    ctx: &mut TestContext,
    member_id: Uuid,
    band_id: Option<Uuid>,
    mut days: AvailabilityGrid,
    comment: Option<String>,
) -> Result<DbGrid, AppError> {
    if let Some(band_id) = band_id {
        let is_member = ctx.band_repo.is_member(band_id, member_id).await?;
        if !is_member {
            return Err(AppError(BandError::PermissionDenied(
                "Not a member of this band".into(),
            )));
        }
    }

    days.prune();

    let row = ctx
        .grid_repo
        .upsert_grid(
            ScheduleOwner::Member(member_id),
            GridScope::from(band_id),
            days,
            comment,
        )
        .await?;

    Ok(row)
}

// Wrapper mirroring the default-schedule lookup
async fn default_schedule_wrapper(
    ctx: &mut TestContext,
    member_id: Uuid,
) -> Result<AvailabilityGrid, AppError> {
    let days = ctx
        .grid_repo
        .get_grid(ScheduleOwner::Member(member_id), GridScope::Default)
        .await?
        .map(|row| row.into_grid())
        .unwrap_or_default();

    Ok(days)
}

#[tokio::test]
async fn test_save_schedule_requires_membership_for_band_scope() {
    let mut ctx = TestContext::new();
    let member_id = Uuid::new_v4();
    let band_id = Uuid::new_v4();

    ctx.band_repo.expect_is_member().returning(|_, _| Ok(false));

    let result = save_schedule_wrapper(
        &mut ctx,
        member_id,
        Some(band_id),
        AvailabilityGrid::new(),
        None,
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BandError::PermissionDenied(_) => {}
        e => panic!("Expected PermissionDenied error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_save_schedule_prunes_all_zero_days() {
    let mut ctx = TestContext::new();
    let member_id = Uuid::new_v4();

    // One real day, one all-zero day that must be dropped on write
    let mut days = AvailabilityGrid::new();
    days.set_day(date(2025, 6, 2), DaySlots::with_hours(&[10]).unwrap());
    let raw: AvailabilityGrid = serde_json::from_str(
        r#"{"2025-06-02":[0,0,0,0,0,0,0,0,0,0,1,0,0,0,0,0,0,0,0,0,0,0,0,0],
            "2025-06-03":[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]}"#,
    )
    .unwrap();
    assert_eq!(raw.len(), 2);

    ctx.grid_repo
        .expect_upsert_grid()
        .withf(|owner, scope, days, _comment| {
            matches!(owner, ScheduleOwner::Member(_))
                && *scope == GridScope::Default
                && days.len() == 1
                && days.day(NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()).is_none()
        })
        .returning(|owner, scope, days, comment| {
            Ok(DbGrid {
                member_id: owner.as_db_id(),
                band_id: scope.as_db_id(),
                days: Json(days),
                comment,
                updated_at: Utc::now(),
            })
        });

    let saved = save_schedule_wrapper(&mut ctx, member_id, None, raw, None)
        .await
        .unwrap();

    assert_eq!(saved.days.0, days);
}

#[tokio::test]
async fn test_default_schedule_empty_when_never_saved() {
    let mut ctx = TestContext::new();

    ctx.grid_repo.expect_get_grid().returning(|_, _| Ok(None));

    let days = default_schedule_wrapper(&mut ctx, Uuid::new_v4()).await.unwrap();
    assert!(days.is_empty());
}

#[tokio::test]
async fn test_default_schedule_returns_saved_grid() {
    let mut ctx = TestContext::new();
    let member_id = Uuid::new_v4();

    let mut days = AvailabilityGrid::new();
    days.set_day(date(2025, 6, 2), DaySlots::with_hours(&[9, 10]).unwrap());
    let stored = days.clone();

    ctx.grid_repo.expect_get_grid().returning(move |owner, scope| {
        Ok(Some(DbGrid {
            member_id: owner.as_db_id(),
            band_id: scope.as_db_id(),
            days: Json(stored.clone()),
            comment: None,
            updated_at: Utc::now(),
        }))
    });

    let loaded = default_schedule_wrapper(&mut ctx, member_id).await.unwrap();
    assert_eq!(loaded, days);
    assert!(loaded.day(date(2025, 6, 2)).unwrap().is_available(9));
}
