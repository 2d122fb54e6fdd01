use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create members table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            identity VARCHAR(255) UNIQUE NOT NULL,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bands table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bands (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            owner_id UUID NOT NULL REFERENCES members(id),
            token VARCHAR(32) UNIQUE NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            start_hour SMALLINT NOT NULL,
            end_hour SMALLINT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_date_window CHECK (end_date >= start_date),
            CONSTRAINT valid_hour_window CHECK (
                start_hour >= 0 AND end_hour <= 23 AND end_hour >= start_hour
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create band_members table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS band_members (
            band_id UUID NOT NULL REFERENCES bands(id),
            member_id UUID NOT NULL REFERENCES members(id),
            joined_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (band_id, member_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create grids table. member_id and band_id carry nil-UUID sentinels
    // (group practice grid, personal default scope), so neither column has
    // a foreign key; cleanup is handled by the owning repositories.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS grids (
            member_id UUID NOT NULL,
            band_id UUID NOT NULL,
            days JSONB NOT NULL,
            comment TEXT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (member_id, band_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_bands_owner_id ON bands(owner_id);
        CREATE INDEX IF NOT EXISTS idx_band_members_member_id ON band_members(member_id);
        CREATE INDEX IF NOT EXISTS idx_band_members_joined_at ON band_members(band_id, joined_at);
        CREATE INDEX IF NOT EXISTS idx_grids_band_id ON grids(band_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
