//! Account registration, login, and profile handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use studyhall_core::repository::user::UserRepository;
use studyhall_infra::auth::password;
use studyhall_types::error::{AuthError, RepositoryError};
use studyhall_types::user::{NewUser, UserProfile, UserRole};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/v1/auth/register - Create a student account.
///
/// Privileged roles are never self-assignable; owner/admin accounts are
/// promoted out of band.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username must not be empty".to_string()));
    }
    if !body.email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if body.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let password_hash = password::hash_password(&body.password)?;

    let new_user = NewUser {
        username: username.to_string(),
        email: body.email.trim().to_string(),
        password_hash,
        role: UserRole::Student,
    };

    let user = state.user_repo.create_user(&new_user).await.map_err(|e| match e {
        RepositoryError::Conflict(column) if column == "username" => {
            AppError::Auth(AuthError::UsernameTaken(new_user.username.clone()))
        }
        RepositoryError::Conflict(_) => {
            AppError::Auth(AuthError::EmailTaken(new_user.email.clone()))
        }
        other => AppError::Internal(other.to_string()),
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "account registered");

    Ok(Json(user.profile()))
}

/// POST /api/v1/auth/login - Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state
        .user_repo
        .get_by_username(body.username.trim())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    if !password::verify_password(&body.password, &user.password_hash) {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    if !user.is_active {
        return Err(AppError::Auth(AuthError::Inactive));
    }

    let access_token = state.jwt.issue(&user)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /api/v1/auth/me - Profile of the authenticated user.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.profile())
}
