use bandsync_core::models::band::Band;
use bandsync_core::models::grid::{AvailabilityGrid, GridScope, ScheduleOwner};
use bandsync_core::models::member::Member;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMember {
    pub id: Uuid,
    pub identity: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbMember> for Member {
    fn from(row: DbMember) -> Self {
        Self {
            id: row.id,
            identity: row.identity,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBand {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub token: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: i16,
    pub end_hour: i16,
    pub created_at: DateTime<Utc>,
}

impl From<DbBand> for Band {
    fn from(row: DbBand) -> Self {
        Self {
            id: row.id,
            name: row.name,
            owner_id: row.owner_id,
            token: row.token,
            start_date: row.start_date,
            end_date: row.end_date,
            start_hour: row.start_hour as u8,
            end_hour: row.end_hour as u8,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBandMember {
    pub band_id: Uuid,
    pub member_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// A stored grid row. The sentinel encodings in `member_id` and `band_id`
/// are translated through [`ScheduleOwner`] and [`GridScope`]; callers
/// should not compare the raw UUIDs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGrid {
    pub member_id: Uuid,
    pub band_id: Uuid,
    pub days: Json<AvailabilityGrid>,
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl DbGrid {
    pub fn owner(&self) -> ScheduleOwner {
        ScheduleOwner::from_db_id(self.member_id)
    }

    pub fn scope(&self) -> GridScope {
        GridScope::from_db_id(self.band_id)
    }

    pub fn into_grid(self) -> AvailabilityGrid {
        self.days.0
    }
}
