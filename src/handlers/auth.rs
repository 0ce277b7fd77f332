use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{self, CurrentUser};
use crate::models::User;
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginPayload {
    token: String,
    user: User,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    validate_registration(&request)?;

    if store::users::find_by_email(&state.db, &request.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let user = store::users::insert(&state.db, &request.name, &request.email, &password_hash)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(created(user, "User registered successfully").into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    // One rejection message for both unknown email and bad password.
    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = store::users::find_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&request.password, &user.password_hash) {
        return Err(invalid());
    }

    let token = auth::generate_token();
    store::sessions::create(
        &state.db,
        user.id,
        &auth::token_digest(&token),
        auth::SESSION_TTL_DAYS,
    )
    .await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(success(LoginPayload { token, user }, "Login successful").into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = auth::bearer_token(&headers)
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

    store::sessions::delete_by_digest(&state.db, &auth::token_digest(token)).await?;
    Ok(empty_success("Logged out").into_response())
}

fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }

    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AppError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }

    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn well_formed_registration_passes() {
        assert!(validate_registration(&request("Ada", "ada@club.dev", "longenough")).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate_registration(&request("  ", "ada@club.dev", "longenough")).is_err());
    }

    #[test]
    fn implausible_emails_are_rejected() {
        for email in ["", "no-at-sign", "@leading", "trailing@"] {
            assert!(
                validate_registration(&request("Ada", email, "longenough")).is_err(),
                "email {email:?} should be rejected"
            );
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let err = validate_registration(&request("Ada", "ada@club.dev", "short")).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
