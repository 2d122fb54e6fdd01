use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BandError, BandResult};

/// Number of hour slots per calendar day.
pub const HOURS_PER_DAY: usize = 24;

/// Availability flags for a single day, one flag per hour slot (0-23).
///
/// A flag is 1 when the owner is available during that hour and 0 otherwise.
/// The wire form is a plain array of 24 integers; anything else is rejected
/// during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DaySlots([u8; HOURS_PER_DAY]);

impl DaySlots {
    /// A day with no availability marked.
    pub fn empty() -> Self {
        Self([0; HOURS_PER_DAY])
    }

    /// Builds a day with the given hours marked available.
    pub fn with_hours(hours: &[u8]) -> BandResult<Self> {
        let mut slots = Self::empty();
        for &hour in hours {
            slots.set(hour, true)?;
        }
        Ok(slots)
    }

    pub fn set(&mut self, hour: u8, available: bool) -> BandResult<()> {
        let slot = self
            .0
            .get_mut(hour as usize)
            .ok_or_else(|| BandError::Validation(format!("Hour {} is out of range", hour)))?;
        *slot = available as u8;
        Ok(())
    }

    pub fn is_available(&self, hour: u8) -> bool {
        self.0.get(hour as usize).copied() == Some(1)
    }

    /// True when no hour of the day is marked.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&flag| flag == 0)
    }

    /// Hours of the day marked available, in ascending order.
    pub fn marked_hours(&self) -> impl Iterator<Item = u8> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &flag)| flag == 1)
            .map(|(hour, _)| hour as u8)
    }
}

impl TryFrom<Vec<u8>> for DaySlots {
    type Error = BandError;

    fn try_from(flags: Vec<u8>) -> Result<Self, Self::Error> {
        if flags.len() != HOURS_PER_DAY {
            return Err(BandError::Validation(format!(
                "A day must have exactly {} hour flags, got {}",
                HOURS_PER_DAY,
                flags.len()
            )));
        }
        if let Some(flag) = flags.iter().find(|&&flag| flag > 1) {
            return Err(BandError::Validation(format!(
                "Hour flags must be 0 or 1, got {}",
                flag
            )));
        }
        let mut slots = [0; HOURS_PER_DAY];
        slots.copy_from_slice(&flags);
        Ok(Self(slots))
    }
}

impl From<DaySlots> for Vec<u8> {
    fn from(slots: DaySlots) -> Self {
        slots.0.to_vec()
    }
}

/// A per-date, per-hour availability bitmap.
///
/// Serializes as a JSON object keyed by ISO-8601 dates, e.g.
/// `{"2025-01-31": [0, 1, 0, ...]}`. Days with no availability are never
/// stored: an all-zero day is removed on write, so it is indistinguishable
/// from an absent entry. For aggregation the two mean the same thing, "no
/// opinion".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityGrid {
    days: BTreeMap<NaiveDate, DaySlots>,
}

impl AvailabilityGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from raw day entries, dropping all-zero days.
    pub fn from_days(days: BTreeMap<NaiveDate, DaySlots>) -> Self {
        let mut grid = Self { days };
        grid.prune();
        grid
    }

    /// Inserts a day entry, or removes the entry when the day is all-zero.
    pub fn set_day(&mut self, date: NaiveDate, slots: DaySlots) {
        if slots.is_empty() {
            self.days.remove(&date);
        } else {
            self.days.insert(date, slots);
        }
    }

    /// Removes all-zero days. Deserialized client input may contain them;
    /// persisted grids never do.
    pub fn prune(&mut self) {
        self.days.retain(|_, slots| !slots.is_empty());
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DaySlots> {
        self.days.get(&date)
    }

    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &DaySlots)> {
        self.days.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }
}

/// Who a grid belongs to: a member's personal availability, or the band's
/// own practice-session schedule.
///
/// The storage layer encodes `GroupDefault` as a nil UUID in the member-id
/// column; that sentinel never leaves the row-conversion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ScheduleOwner {
    Member(Uuid),
    GroupDefault,
}

impl ScheduleOwner {
    pub fn from_db_id(id: Uuid) -> Self {
        if id.is_nil() {
            Self::GroupDefault
        } else {
            Self::Member(id)
        }
    }

    pub fn as_db_id(self) -> Uuid {
        match self {
            Self::Member(id) => id,
            Self::GroupDefault => Uuid::nil(),
        }
    }

    pub fn is_group_default(self) -> bool {
        matches!(self, Self::GroupDefault)
    }
}

/// Which calendar a grid applies to: a specific band, or the member's
/// default grid used to prefill band schedules.
///
/// Same storage convention as [`ScheduleOwner`]: `Default` is a nil UUID in
/// the band-id column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridScope {
    Default,
    Band(Uuid),
}

impl GridScope {
    pub fn from_db_id(id: Uuid) -> Self {
        if id.is_nil() {
            Self::Default
        } else {
            Self::Band(id)
        }
    }

    pub fn as_db_id(self) -> Uuid {
        match self {
            Self::Default => Uuid::nil(),
            Self::Band(id) => id,
        }
    }
}

impl From<Option<Uuid>> for GridScope {
    fn from(band_id: Option<Uuid>) -> Self {
        match band_id {
            Some(id) => Self::Band(id),
            None => Self::Default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveScheduleRequest {
    pub band_id: Option<Uuid>,
    pub days: AvailabilityGrid,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveScheduleResponse {
    pub band_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetScheduleResponse {
    pub band_id: Option<Uuid>,
    pub window: crate::aggregate::DisplayWindow,
    pub days: AvailabilityGrid,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDefaultScheduleResponse {
    pub days: AvailabilityGrid,
}
