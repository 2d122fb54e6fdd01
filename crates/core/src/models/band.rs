use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{AvailabilitySummary, DisplayWindow};
use crate::errors::{BandError, BandResult};
use crate::models::grid::AvailabilityGrid;

/// A band: a recurring group with an owner, an invite token, and the
/// date/hour window its members coordinate over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Band {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub token: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u8,
    pub end_hour: u8,
    pub created_at: DateTime<Utc>,
}

impl Band {
    /// Ownership is exactly `owner_id == member`; there is no role
    /// hierarchy beyond owner and member.
    pub fn is_owned_by(&self, member_id: Uuid) -> bool {
        self.owner_id == member_id
    }
}

/// Checks the band window invariants: start date not after end date, start
/// hour not after end hour, hours within a day.
pub fn validate_window(
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_hour: u8,
    end_hour: u8,
) -> BandResult<()> {
    if start_date > end_date {
        return Err(BandError::Validation(
            "Start date must not be after end date".to_string(),
        ));
    }
    if end_hour > 23 {
        return Err(BandError::Validation(format!(
            "End hour {} is out of range",
            end_hour
        )));
    }
    if start_hour > end_hour {
        return Err(BandError::Validation(
            "Start hour must not be after end hour".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBandRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl CreateBandRequest {
    pub fn validate(&self) -> BandResult<()> {
        if self.name.trim().is_empty() {
            return Err(BandError::Validation(
                "Band name must not be empty".to_string(),
            ));
        }
        validate_window(
            self.start_date,
            self.end_date,
            self.start_hour,
            self.end_hour,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBandResponse {
    pub id: Uuid,
    pub name: String,
    pub token: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u8,
    pub end_hour: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBandRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl UpdateBandRequest {
    pub fn validate(&self) -> BandResult<()> {
        if self.name.trim().is_empty() {
            return Err(BandError::Validation(
                "Band name must not be empty".to_string(),
            ));
        }
        validate_window(
            self.start_date,
            self.end_date,
            self.start_hour,
            self.end_hour,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBandResponse {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
}

/// One band in a member's band list, with the display names of everyone in
/// it (join order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandSummary {
    pub id: Uuid,
    pub name: String,
    pub token: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u8,
    pub end_hour: u8,
    pub is_owner: bool,
    pub member_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBandsResponse {
    pub bands: Vec<BandSummary>,
}

/// The aggregate view of a band: its window plus, per (date, hour) cell,
/// how many members are available and who they are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBandResponse {
    pub id: Uuid,
    pub name: String,
    pub token: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u8,
    pub end_hour: u8,
    pub is_owner: bool,
    pub total_members: usize,
    pub members: Vec<String>,
    pub window: DisplayWindow,
    pub summary: AvailabilitySummary,
}

/// Whether a join request created a membership or found one already there.
/// Both are success from the caller's perspective, but they render
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined,
    AlreadyMember,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinBandRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinBandResponse {
    pub band_id: Uuid,
    pub name: String,
    pub outcome: JoinOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveBandResponse {
    pub band_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBandResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPracticeResponse {
    pub band_id: Uuid,
    pub window: DisplayWindow,
    pub days: AvailabilityGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePracticeRequest {
    pub days: AvailabilityGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePracticeResponse {
    pub band_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

/// One band's practice grid in the cross-band overview, with the display
/// color assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeBandView {
    pub band_id: Uuid,
    pub name: String,
    pub color: String,
    pub days: AvailabilityGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeOverviewResponse {
    pub window: DisplayWindow,
    pub bands: Vec<PracticeBandView>,
}
