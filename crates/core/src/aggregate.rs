//! # Availability Aggregation
//!
//! This module folds the availability grids of a band's members into a
//! per-cell summary the owner can scan for workable practice times.
//!
//! ## Aggregation Algorithm
//!
//! The aggregator walks every member's grid once. For each stored day and
//! each hour marked available, it increments the (date, hour) cell's count
//! and appends the member's display name to the cell's contributor list.
//!
//! Two properties matter to callers:
//!
//! 1. Members are visited in exactly the order the caller supplies them, so
//!    counts and contributor lists stay consistent within a run. Handlers
//!    pass members in membership join order.
//! 2. No window filtering happens here. Aggregation covers every persisted
//!    date; the display window only truncates what is rendered downstream.
//!    A member with no entry for a date contributes nothing to that date.
//!
//! Cost is O(M × D) over M members and D stored days per member; the hour
//! dimension is a fixed 24-slot scan.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::band::Band;
use crate::models::grid::AvailabilityGrid;

/// Every calendar date from `start` to `end` inclusive, in order,
/// contiguous across month and year boundaries. Empty when `start > end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current = match current.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    dates
}

/// Every hour from `start` to `end` inclusive. Empty when `start > end`.
pub fn hour_range(start: u8, end: u8) -> Vec<u8> {
    (start..=end).collect()
}

/// The date/hour bounds a grid view is rendered over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub dates: Vec<NaiveDate>,
    pub hours: Vec<u8>,
}

impl DisplayWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, start_hour: u8, end_hour: u8) -> Self {
        Self {
            dates: date_range(start_date, end_date),
            hours: hour_range(start_hour, end_hour),
        }
    }

    /// The window of a single band.
    pub fn for_band(band: &Band) -> Self {
        Self::new(
            band.start_date,
            band.end_date,
            band.start_hour,
            band.end_hour,
        )
    }

    /// The smallest window covering every given band, used by the
    /// cross-band schedule and practice views. `None` when the slice is
    /// empty.
    pub fn spanning(bands: &[Band]) -> Option<Self> {
        let start_date = bands.iter().map(|band| band.start_date).min()?;
        let end_date = bands.iter().map(|band| band.end_date).max()?;
        let start_hour = bands.iter().map(|band| band.start_hour).min()?;
        let end_hour = bands.iter().map(|band| band.end_hour).max()?;
        Some(Self::new(start_date, end_date, start_hour, end_hour))
    }

    /// Two weeks from `today`, all hours. Used when a member belongs to no
    /// band yet.
    pub fn fallback(today: NaiveDate) -> Self {
        let end = today.checked_add_days(Days::new(13)).unwrap_or(today);
        Self::new(today, end, 0, 23)
    }
}

/// A derived (date, hour) cell: how many members are available and who.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCell {
    pub count: usize,
    pub contributors: Vec<String>,
}

/// Aggregated availability for a band, keyed date → hour → cell. Only
/// cells with at least one available member are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilitySummary {
    cells: BTreeMap<NaiveDate, BTreeMap<u8, AggregateCell>>,
}

impl AvailabilitySummary {
    pub fn cell(&self, date: NaiveDate, hour: u8) -> Option<&AggregateCell> {
        self.cells.get(&date).and_then(|hours| hours.get(&hour))
    }

    /// The number of members available at a cell; 0 when the cell is
    /// absent.
    pub fn count(&self, date: NaiveDate, hour: u8) -> usize {
        self.cell(date, hour).map_or(0, |cell| cell.count)
    }

    pub fn contributors(&self, date: NaiveDate, hour: u8) -> &[String] {
        self.cell(date, hour)
            .map_or(&[], |cell| cell.contributors.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Dates that have at least one non-empty cell, in order.
    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.cells.keys()
    }

    fn mark(&mut self, date: NaiveDate, hour: u8, member_name: &str) {
        let cell = self
            .cells
            .entry(date)
            .or_default()
            .entry(hour)
            .or_default();
        cell.count += 1;
        cell.contributors.push(member_name.to_string());
    }
}

/// Folds member grids into an [`AvailabilitySummary`].
///
/// `entries` yields `(display name, grid)` pairs; each member must appear
/// at most once — the caller pre-filters to the band's membership and this
/// function trusts that set. Per cell, the resulting count equals the
/// number of input members with that hour marked, and `contributors` holds
/// exactly those members' names in input order.
pub fn aggregate<'a, I>(entries: I) -> AvailabilitySummary
where
    I: IntoIterator<Item = (&'a str, &'a AvailabilityGrid)>,
{
    let mut summary = AvailabilitySummary::default();
    for (member_name, grid) in entries {
        for (&date, slots) in grid.days() {
            for hour in slots.marked_hours() {
                summary.mark(date, hour, member_name);
            }
        }
    }
    summary
}
