use crate::models::DbMember;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn upsert_member(
    pool: &Pool<Postgres>,
    identity: &str,
    name: &str,
) -> Result<DbMember> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Upserting member: identity={}, name={}", identity, name);

    let member = sqlx::query_as::<_, DbMember>(
        r#"
        INSERT INTO members (id, identity, name, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (identity)
        DO UPDATE SET name = EXCLUDED.name
        RETURNING id, identity, name, created_at
        "#,
    )
    .bind(id)
    .bind(identity)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(member)
}

pub async fn get_member_by_identity(
    pool: &Pool<Postgres>,
    identity: &str,
) -> Result<Option<DbMember>> {
    let member = sqlx::query_as::<_, DbMember>(
        r#"
        SELECT id, identity, name, created_at
        FROM members
        WHERE identity = $1
        "#,
    )
    .bind(identity)
    .fetch_optional(pool)
    .await?;

    Ok(member)
}

pub async fn get_member_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbMember>> {
    let member = sqlx::query_as::<_, DbMember>(
        r#"
        SELECT id, identity, name, created_at
        FROM members
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(member)
}
