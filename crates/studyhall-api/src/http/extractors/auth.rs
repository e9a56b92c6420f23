//! Bearer token authentication extractors.
//!
//! [`CurrentUser`] verifies the `Authorization: Bearer <token>` header
//! and loads the account row, so deactivation takes effect on the next
//! request regardless of token expiry. [`RequireAdmin`] and
//! [`RequireOwner`] layer role checks on top; handlers state their
//! access requirement in the signature.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use studyhall_core::repository::user::UserRepository;
use studyhall_types::error::AuthError;
use studyhall_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated request principal. Extracting this validates the token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let claims = state.jwt.verify(&token)?;

        let user = state
            .user_repo
            .get_user(claims.sub)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?
            .ok_or(AppError::Auth(AuthError::InvalidToken))?;

        if !user.is_active {
            return Err(AppError::Auth(AuthError::Inactive));
        }

        Ok(CurrentUser(user))
    }
}

/// Principal that must hold the admin or owner role.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }
        Ok(RequireAdmin(user))
    }
}

/// Principal that must hold the owner role.
pub struct RequireOwner(pub User);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != studyhall_types::user::UserRole::Owner {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }
        Ok(RequireOwner(user))
    }
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer_token(parts: &Parts) -> Result<String, AppError> {
    let auth = parts
        .headers
        .get("authorization")
        .ok_or_else(|| AppError::Auth(AuthError::InvalidToken))?;

    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Auth(AuthError::InvalidToken))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .ok_or(AppError::Auth(AuthError::InvalidToken))
}
