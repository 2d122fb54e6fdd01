use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BandError, BandResult};

/// A registered member. The `identity` string is issued and verified by the
/// external identity provider; this service only stores and compares it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub identity: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterMemberRequest {
    pub name: String,
}

impl RegisterMemberRequest {
    pub fn validate(&self) -> BandResult<()> {
        if self.name.trim().is_empty() {
            return Err(BandError::Validation(
                "Display name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub identity: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteGridsResponse {
    pub member_id: Uuid,
    pub deleted: bool,
}
