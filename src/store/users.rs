use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Role, User};
use crate::utils::error::{on_unique_violation, AppError};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, profile_picture, created_at, updated_at";

pub async fn insert(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    let sql = format!(
        "INSERT INTO users (id, name, email, password_hash) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {USER_COLUMNS}"
    );

    sqlx::query_as::<_, User>(&sql)
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| on_unique_violation(e, "A user with this email already exists"))
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn list(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");

    let users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(users)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    email: &str,
    role: Role,
) -> Result<Option<User>, AppError> {
    let sql = format!(
        "UPDATE users SET name = $2, email = $3, role = $4, updated_at = now() \
         WHERE id = $1 \
         RETURNING {USER_COLUMNS}"
    );

    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(role)
        .fetch_optional(pool)
        .await
        .map_err(|e| on_unique_violation(e, "A user with this email already exists"))
}

/// Returns false when no row matched.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_admins(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'ADMIN'")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
