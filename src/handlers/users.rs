use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{require_admin, CurrentUser};
use crate::models::Role;
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Response, AppError> {
    require_admin(&current_user)?;

    let users = store::users::list(&state.db).await?;
    Ok(success(users, "Users fetched successfully").into_response())
}

pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Response, AppError> {
    require_admin(&current_user)?;

    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Name and email are required".to_string(),
        ));
    }

    let user = store::users::update(
        &state.db,
        user_id,
        request.name.trim(),
        request.email.trim(),
        request.role,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(success(user, "User updated successfully").into_response())
}

pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_admin(&current_user)?;

    let user = store::users::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // The club must always have an administrator left.
    if user.role == Role::Admin && store::users::count_admins(&state.db).await? <= 1 {
        return Err(AppError::ValidationError(
            "Cannot delete the last admin user".to_string(),
        ));
    }

    store::users::delete(&state.db, user_id).await?;

    tracing::info!(user_id = %user_id, deleted_by = %current_user.id, "User deleted");
    Ok(empty_success("User deleted successfully").into_response())
}
