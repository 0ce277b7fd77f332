use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Role, Session};
use crate::utils::error::AppError;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    token_digest: &str,
    ttl_days: i64,
) -> Result<Session, AppError> {
    let session = sqlx::query_as::<_, Session>(
        "INSERT INTO sessions (id, user_id, token_digest, expires_at) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, user_id, token_digest, created_at, expires_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(token_digest)
    .bind(Utc::now() + Duration::days(ttl_days))
    .fetch_one(pool)
    .await?;
    Ok(session)
}

/// Resolve a token digest to the owning user's id and role. Expired
/// sessions are treated as absent.
pub async fn find_user_by_digest(
    pool: &PgPool,
    token_digest: &str,
) -> Result<Option<(Uuid, Role)>, AppError> {
    let row = sqlx::query_as::<_, (Uuid, Role)>(
        "SELECT u.id, u.role FROM sessions s \
         JOIN users u ON u.id = s.user_id \
         WHERE s.token_digest = $1 AND s.expires_at > now()",
    )
    .bind(token_digest)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete_by_digest(pool: &PgPool, token_digest: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_digest = $1")
        .bind(token_digest)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
