use crate::models::{DbBand, DbMember};
use bandsync_core::models::band::JoinOutcome;
use chrono::Utc;
use eyre::Result;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const TOKEN_LENGTH: usize = 16;

/// Random alphanumeric invite token. Uniqueness is enforced by the unique
/// constraint on bands.token.
fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Creates a band and adds the owner as its first member, in one
/// transaction.
pub async fn create_band(
    pool: &Pool<Postgres>,
    name: &str,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    start_hour: u8,
    end_hour: u8,
    owner_id: Uuid,
) -> Result<DbBand> {
    let id = Uuid::new_v4();
    let token = generate_token();
    let now = Utc::now();

    tracing::debug!(
        "Creating band: id={}, name={}, owner_id={}",
        id, name, owner_id
    );

    let mut tx = pool.begin().await?;

    let band = sqlx::query_as::<_, DbBand>(
        r#"
        INSERT INTO bands
            (id, name, owner_id, token, start_date, end_date, start_hour, end_hour, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, name, owner_id, token, start_date, end_date, start_hour, end_hour, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(owner_id)
    .bind(&token)
    .bind(start_date)
    .bind(end_date)
    .bind(start_hour as i16)
    .bind(end_hour as i16)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO band_members (band_id, member_id, joined_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(band.id)
    .bind(owner_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Band created successfully: id={}", band.id);
    Ok(band)
}

pub async fn get_band_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBand>> {
    let band = sqlx::query_as::<_, DbBand>(
        r#"
        SELECT id, name, owner_id, token, start_date, end_date, start_hour, end_hour, created_at
        FROM bands
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(band)
}

pub async fn get_band_by_token(pool: &Pool<Postgres>, token: &str) -> Result<Option<DbBand>> {
    tracing::debug!("Getting band by token");

    let band = sqlx::query_as::<_, DbBand>(
        r#"
        SELECT id, name, owner_id, token, start_date, end_date, start_hour, end_hour, created_at
        FROM bands
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(band)
}

/// Bands the member belongs to, most recently ending first.
pub async fn list_bands_for_member(
    pool: &Pool<Postgres>,
    member_id: Uuid,
) -> Result<Vec<DbBand>> {
    let bands = sqlx::query_as::<_, DbBand>(
        r#"
        SELECT b.id, b.name, b.owner_id, b.token, b.start_date, b.end_date,
               b.start_hour, b.end_hour, b.created_at
        FROM bands b
        JOIN band_members bm ON b.id = bm.band_id
        WHERE bm.member_id = $1
        ORDER BY b.end_date DESC, b.created_at DESC
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;

    Ok(bands)
}

/// Members of a band in join order. This ordering is what makes
/// aggregation output deterministic across requests.
pub async fn list_members(pool: &Pool<Postgres>, band_id: Uuid) -> Result<Vec<DbMember>> {
    let members = sqlx::query_as::<_, DbMember>(
        r#"
        SELECT m.id, m.identity, m.name, m.created_at
        FROM members m
        JOIN band_members bm ON m.id = bm.member_id
        WHERE bm.band_id = $1
        ORDER BY bm.joined_at ASC
        "#,
    )
    .bind(band_id)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

pub async fn update_band(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: &str,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    start_hour: u8,
    end_hour: u8,
) -> Result<DbBand> {
    let band = sqlx::query_as::<_, DbBand>(
        r#"
        UPDATE bands
        SET name = $2, start_date = $3, end_date = $4, start_hour = $5, end_hour = $6
        WHERE id = $1
        RETURNING id, name, owner_id, token, start_date, end_date, start_hour, end_hour, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(start_date)
    .bind(end_date)
    .bind(start_hour as i16)
    .bind(end_hour as i16)
    .fetch_one(pool)
    .await?;

    Ok(band)
}

/// Deletes a band and everything scoped to it: grid rows for the band
/// (every owner, the group practice sentinel included), memberships, then
/// the band row itself. One transaction.
pub async fn delete_band(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    tracing::debug!("Deleting band: id={}", id);

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM grids WHERE band_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM band_members WHERE band_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM bands WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Adds a member to a band. A duplicate join loses the conflict race and
/// is reported as `AlreadyMember`, never as an error.
pub async fn add_member(
    pool: &Pool<Postgres>,
    band_id: Uuid,
    member_id: Uuid,
) -> Result<JoinOutcome> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO band_members (band_id, member_id, joined_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (band_id, member_id) DO NOTHING
        "#,
    )
    .bind(band_id)
    .bind(member_id)
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        Ok(JoinOutcome::AlreadyMember)
    } else {
        Ok(JoinOutcome::Joined)
    }
}

/// Removes a member from a band along with their grid for that band.
/// Returns false when there was no membership to remove. The member's
/// default-scope grid is not touched.
pub async fn remove_member(
    pool: &Pool<Postgres>,
    band_id: Uuid,
    member_id: Uuid,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        DELETE FROM band_members
        WHERE band_id = $1 AND member_id = $2
        "#,
    )
    .bind(band_id)
    .bind(member_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM grids
        WHERE band_id = $1 AND member_id = $2
        "#,
    )
    .bind(band_id)
    .bind(member_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

pub async fn is_member(pool: &Pool<Postgres>, band_id: Uuid, member_id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM band_members
            WHERE band_id = $1 AND member_id = $2
        );
        "#,
    )
    .bind(band_id)
    .bind(member_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
