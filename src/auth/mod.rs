//! Session resolution and authorization.
//!
//! Registration and login live in `handlers::auth`; this module owns the
//! credential primitives, the `CurrentUser` extractor that resolves a bearer
//! token to an authenticated user, and the role check used by admin routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::models::Role;
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{generate_token, token_digest, SESSION_TTL_DAYS};

/// The authenticated caller, resolved from the request's session token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

        let digest = token_digest(token);
        let (id, role) = store::sessions::find_user_by_digest(&state.db, &digest)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid or expired session".to_string()))?;

        Ok(CurrentUser { id, role })
    }
}

/// The token presented on this request, if any. Used by logout, which needs
/// the raw token back to revoke the matching session.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Single authorization check invoked by every admin operation.
pub fn require_role(user: &CurrentUser, role: Role) -> Result<(), AppError> {
    if user.role == role {
        Ok(())
    } else {
        Err(AppError::Forbidden("Administrator access required".to_string()))
    }
}

pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    require_role(user, Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user_with_role(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn admin_passes_the_role_check() {
        assert!(require_admin(&user_with_role(Role::Admin)).is_ok());
    }

    #[test]
    fn coder_is_forbidden_from_admin_operations() {
        let err = require_admin(&user_with_role(Role::Coder)).unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[test]
    fn bearer_token_parses_the_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_absence() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwdw=="),
        );
        assert_eq!(bearer_token(&headers), None);
    }
}
