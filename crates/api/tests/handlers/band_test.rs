use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use bandsync_api::middleware::error_handling::AppError;
use bandsync_core::{
    aggregate::{aggregate, AvailabilitySummary, DisplayWindow},
    errors::BandError,
    models::band::{Band, JoinBandResponse, JoinOutcome},
    models::grid::{AvailabilityGrid, DaySlots, GridScope, ScheduleOwner},
};
use bandsync_db::models::{DbBand, DbGrid, DbMember};

use crate::test_utils::TestContext;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_band(owner_id: Uuid) -> DbBand {
    DbBand {
        id: Uuid::new_v4(),
        name: "Jazz Quartet".to_string(),
        owner_id,
        token: "a1B2c3D4e5F6g7H8".to_string(),
        start_date: date(2025, 6, 1),
        end_date: date(2025, 6, 2),
        start_hour: 18,
        end_hour: 21,
        created_at: Utc::now(),
    }
}

fn make_member(name: &str) -> DbMember {
    DbMember {
        id: Uuid::new_v4(),
        identity: format!("{}@example.com", name.to_lowercase()),
        name: name.to_string(),
        created_at: Utc::now(),
    }
}

fn make_grid_row(owner: ScheduleOwner, scope: GridScope, days: AvailabilityGrid) -> DbGrid {
    DbGrid {
        member_id: owner.as_db_id(),
        band_id: scope.as_db_id(),
        days: Json(days),
        comment: None,
        updated_at: Utc::now(),
    }
}

// Wrapper mirroring the join handler against mock repositories
async fn join_band_wrapper(
    ctx: &mut TestContext,
    token: &str,
    member_id: Uuid,
) -> Result<JoinBandResponse, AppError> {
    let band = ctx
        .band_repo
        .get_band_by_token(token.to_string())
        .await?
        .ok_or_else(|| AppError(BandError::NotFound("No band matches this token".into())))?;

    let outcome = ctx.band_repo.add_member(band.id, member_id).await?;

    Ok(JoinBandResponse {
        band_id: band.id,
        name: band.name,
        outcome,
    })
}

// Wrapper mirroring the leave handler: the owner is refused, everyone
// else is removed
async fn leave_band_wrapper(
    ctx: &mut TestContext,
    token: &str,
    member_id: Uuid,
) -> Result<Uuid, AppError> {
    let band = ctx
        .band_repo
        .get_band_by_token(token.to_string())
        .await?
        .ok_or_else(|| AppError(BandError::NotFound("No band matches this token".into())))?;

    if band.owner_id == member_id {
        return Err(AppError(BandError::PermissionDenied(
            "The band owner cannot leave; delete the band instead".into(),
        )));
    }

    let removed = ctx.band_repo.remove_member(band.id, member_id).await?;
    if !removed {
        return Err(AppError(BandError::NotFound(
            "Not a member of this band".into(),
        )));
    }

    Ok(band.id)
}

// Wrapper mirroring the delete handler, owner gate included
async fn delete_band_wrapper(
    ctx: &mut TestContext,
    token: &str,
    member_id: Uuid,
) -> Result<Uuid, AppError> {
    let band = ctx
        .band_repo
        .get_band_by_token(token.to_string())
        .await?
        .ok_or_else(|| AppError(BandError::NotFound("No band matches this token".into())))?;

    if band.owner_id != member_id {
        return Err(AppError(BandError::PermissionDenied(
            "Only the band owner can delete the band".into(),
        )));
    }

    ctx.band_repo.delete_band(band.id).await?;
    Ok(band.id)
}

// Wrapper mirroring the aggregate band view: members in join order,
// grids paired by owner, group practice row excluded
async fn band_view_wrapper(
    ctx: &mut TestContext,
    token: &str,
    member_id: Uuid,
) -> Result<(bool, DisplayWindow, AvailabilitySummary), AppError> {
    let band = ctx
        .band_repo
        .get_band_by_token(token.to_string())
        .await?
        .ok_or_else(|| AppError(BandError::NotFound("No band matches this token".into())))?;

    let members = ctx.band_repo.list_members(band.id).await?;
    let grid_rows = ctx.grid_repo.get_grids_by_band(band.id).await?;

    let mut grids_by_member = HashMap::new();
    for row in grid_rows {
        if let ScheduleOwner::Member(owner_id) = row.owner() {
            grids_by_member.insert(owner_id, row.into_grid());
        }
    }

    let entries = members.iter().filter_map(|m| {
        grids_by_member
            .get(&m.id)
            .map(|grid| (m.name.as_str(), grid))
    });
    let summary = aggregate(entries);

    let band: Band = band.into();
    Ok((
        band.is_owned_by(member_id),
        DisplayWindow::for_band(&band),
        summary,
    ))
}

#[tokio::test]
async fn test_join_band_unknown_token() {
    let mut ctx = TestContext::new();

    ctx.band_repo
        .expect_get_band_by_token()
        .returning(|_| Ok(None));

    let result = join_band_wrapper(&mut ctx, "nosuchtoken00000", Uuid::new_v4()).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BandError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_join_band_twice_is_idempotent() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let member_id = Uuid::new_v4();
    let band = make_band(owner_id);
    let token = band.token.clone();

    ctx.band_repo
        .expect_get_band_by_token()
        .times(2)
        .returning(move |_| Ok(Some(band.clone())));

    // First join inserts, the second loses the conflict race
    let calls = AtomicUsize::new(0);
    ctx.band_repo
        .expect_add_member()
        .times(2)
        .returning(move |_, _| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(JoinOutcome::Joined)
            } else {
                Ok(JoinOutcome::AlreadyMember)
            }
        });

    let first = join_band_wrapper(&mut ctx, &token, member_id).await.unwrap();
    let second = join_band_wrapper(&mut ctx, &token, member_id).await.unwrap();

    assert_eq!(first.outcome, JoinOutcome::Joined);
    assert_eq!(second.outcome, JoinOutcome::AlreadyMember);
    assert_eq!(first.band_id, second.band_id);
}

#[tokio::test]
async fn test_owner_cannot_leave() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let band = make_band(owner_id);
    let token = band.token.clone();

    ctx.band_repo
        .expect_get_band_by_token()
        .returning(move |_| Ok(Some(band.clone())));

    // No remove_member expectation: the wrapper must refuse before any
    // membership change
    let result = leave_band_wrapper(&mut ctx, &token, owner_id).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BandError::PermissionDenied(_) => {}
        e => panic!("Expected PermissionDenied error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_member_can_leave() {
    let mut ctx = TestContext::new();
    let band = make_band(Uuid::new_v4());
    let band_id = band.id;
    let member_id = Uuid::new_v4();
    let token = band.token.clone();

    ctx.band_repo
        .expect_get_band_by_token()
        .returning(move |_| Ok(Some(band.clone())));
    ctx.band_repo
        .expect_remove_member()
        .times(1)
        .returning(|_, _| Ok(true));

    let left = leave_band_wrapper(&mut ctx, &token, member_id).await.unwrap();
    assert_eq!(left, band_id);
}

#[tokio::test]
async fn test_leave_band_when_not_a_member() {
    let mut ctx = TestContext::new();
    let band = make_band(Uuid::new_v4());
    let token = band.token.clone();

    ctx.band_repo
        .expect_get_band_by_token()
        .returning(move |_| Ok(Some(band.clone())));
    ctx.band_repo
        .expect_remove_member()
        .returning(|_, _| Ok(false));

    let result = leave_band_wrapper(&mut ctx, &token, Uuid::new_v4()).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BandError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_delete_band_requires_owner() {
    let mut ctx = TestContext::new();
    let band = make_band(Uuid::new_v4());
    let token = band.token.clone();

    ctx.band_repo
        .expect_get_band_by_token()
        .returning(move |_| Ok(Some(band.clone())));

    let result = delete_band_wrapper(&mut ctx, &token, Uuid::new_v4()).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BandError::PermissionDenied(_) => {}
        e => panic!("Expected PermissionDenied error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_delete_band_removes_it_from_member_lists() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let band = make_band(owner_id);
    let band_id = band.id;
    let token = band.token.clone();

    ctx.band_repo
        .expect_get_band_by_token()
        .returning(move |_| Ok(Some(band.clone())));
    ctx.band_repo
        .expect_delete_band()
        .times(1)
        .returning(|_| Ok(()));
    // After the cascade no membership row is left to join against
    ctx.band_repo
        .expect_list_bands_for_member()
        .returning(|_| Ok(vec![]));

    let deleted = delete_band_wrapper(&mut ctx, &token, owner_id).await.unwrap();
    assert_eq!(deleted, band_id);

    let remaining = ctx.band_repo.list_bands_for_member(owner_id).await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_band_view_aggregates_member_grids() {
    let mut ctx = TestContext::new();
    let owner = make_member("Alice");
    let other = make_member("Bob");
    let owner_id = owner.id;

    let band = make_band(owner_id);
    let band_id = band.id;
    let token = band.token.clone();

    let monday = date(2025, 6, 2);
    let tuesday = date(2025, 6, 3);

    let mut alice_grid = AvailabilityGrid::new();
    alice_grid.set_day(monday, DaySlots::with_hours(&[10]).unwrap());

    let mut bob_grid = AvailabilityGrid::new();
    bob_grid.set_day(monday, DaySlots::with_hours(&[10]).unwrap());
    bob_grid.set_day(tuesday, DaySlots::with_hours(&[14]).unwrap());

    // The group practice row is scoped to the band but owned by the
    // sentinel; the member view must not count it
    let mut practice_grid = AvailabilityGrid::new();
    practice_grid.set_day(monday, DaySlots::with_hours(&[10]).unwrap());

    let grid_rows = vec![
        make_grid_row(
            ScheduleOwner::Member(owner.id),
            GridScope::Band(band_id),
            alice_grid,
        ),
        make_grid_row(
            ScheduleOwner::Member(other.id),
            GridScope::Band(band_id),
            bob_grid,
        ),
        make_grid_row(
            ScheduleOwner::GroupDefault,
            GridScope::Band(band_id),
            practice_grid,
        ),
    ];

    ctx.band_repo
        .expect_get_band_by_token()
        .returning(move |_| Ok(Some(band.clone())));
    ctx.band_repo
        .expect_list_members()
        .returning(move |_| Ok(vec![owner.clone(), other.clone()]));
    ctx.grid_repo
        .expect_get_grids_by_band()
        .returning(move |_| Ok(grid_rows.clone()));

    let (is_owner, window, summary) = band_view_wrapper(&mut ctx, &token, owner_id).await.unwrap();

    assert!(is_owner);
    assert_eq!(window.hours, vec![18, 19, 20, 21]);
    assert_eq!(window.dates, vec![date(2025, 6, 1), date(2025, 6, 2)]);

    assert_eq!(summary.count(monday, 10), 2);
    assert_eq!(summary.contributors(monday, 10), ["Alice", "Bob"]);
    assert_eq!(summary.count(tuesday, 14), 1);
    assert_eq!(summary.contributors(tuesday, 14), ["Bob"]);
    assert_eq!(summary.count(monday, 11), 0);
}
