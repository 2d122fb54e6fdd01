use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use bandsync_core::models::band::JoinOutcome;
use bandsync_core::models::grid::{AvailabilityGrid, GridScope, ScheduleOwner};

use crate::models::{DbBand, DbGrid, DbMember};

// Mock repositories for testing
mock! {
    pub MemberRepo {
        pub async fn upsert_member(
            &self,
            identity: String,
            name: String,
        ) -> eyre::Result<DbMember>;

        pub async fn get_member_by_identity(
            &self,
            identity: String,
        ) -> eyre::Result<Option<DbMember>>;

        pub async fn get_member_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbMember>>;
    }
}

mock! {
    pub BandRepo {
        pub async fn create_band(
            &self,
            name: String,
            start_date: NaiveDate,
            end_date: NaiveDate,
            start_hour: u8,
            end_hour: u8,
            owner_id: Uuid,
        ) -> eyre::Result<DbBand>;

        pub async fn get_band_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBand>>;

        pub async fn get_band_by_token(
            &self,
            token: String,
        ) -> eyre::Result<Option<DbBand>>;

        pub async fn list_bands_for_member(
            &self,
            member_id: Uuid,
        ) -> eyre::Result<Vec<DbBand>>;

        pub async fn list_members(
            &self,
            band_id: Uuid,
        ) -> eyre::Result<Vec<DbMember>>;

        pub async fn update_band(
            &self,
            id: Uuid,
            name: String,
            start_date: NaiveDate,
            end_date: NaiveDate,
            start_hour: u8,
            end_hour: u8,
        ) -> eyre::Result<DbBand>;

        pub async fn delete_band(
            &self,
            id: Uuid,
        ) -> eyre::Result<()>;

        pub async fn add_member(
            &self,
            band_id: Uuid,
            member_id: Uuid,
        ) -> eyre::Result<JoinOutcome>;

        pub async fn remove_member(
            &self,
            band_id: Uuid,
            member_id: Uuid,
        ) -> eyre::Result<bool>;

        pub async fn is_member(
            &self,
            band_id: Uuid,
            member_id: Uuid,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub GridRepo {
        pub async fn get_grid(
            &self,
            owner: ScheduleOwner,
            scope: GridScope,
        ) -> eyre::Result<Option<DbGrid>>;

        pub async fn get_grids_by_band(
            &self,
            band_id: Uuid,
        ) -> eyre::Result<Vec<DbGrid>>;

        pub async fn get_grids_by_member(
            &self,
            member_id: Uuid,
        ) -> eyre::Result<Vec<DbGrid>>;

        pub async fn upsert_grid(
            &self,
            owner: ScheduleOwner,
            scope: GridScope,
            days: AvailabilityGrid,
            comment: Option<String>,
        ) -> eyre::Result<DbGrid>;

        pub async fn delete_grids_by_member(
            &self,
            member_id: Uuid,
        ) -> eyre::Result<()>;
    }
}
