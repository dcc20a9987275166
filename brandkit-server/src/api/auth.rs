//! Authentication endpoints: register, login, current user

use axum::{Extension, Json, extract::State};
use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest, UserProfile,
    normalize_email,
};

use crate::auth::UserIdentity;
use crate::auth::user_auth::create_token;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

use super::ApiResult;

fn issue_token(state: &AppState, user: &shared::models::User) -> Result<String, AppError> {
    create_token(user.id, &user.email, &state.jwt).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ServiceResult<(StatusCode, Json<AuthResponse>)> {
    let new_user = req.validate()?;

    if db::users::find_by_email(&state.pool, &new_user.email)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmailAlreadyRegistered).into());
    }

    let hashed = hash_password(&new_user.password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let now = shared::util::now_millis();
    let user = match db::users::create(&state.pool, &new_user, &hashed, now).await {
        Ok(user) => user,
        // lost a race with a concurrent registration for the same email
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::new(ErrorCode::EmailAlreadyRegistered).into());
        }
        Err(e) => return Err(e.into()),
    };

    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".into(),
            token,
            user: UserProfile::from(&user),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = normalize_email(&req.email);
    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error during login: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.password) {
        return Err(AppError::invalid_credentials());
    }

    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".into(),
        token,
        user: UserProfile::from(&user),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ServiceResult<Json<CurrentUserResponse>> {
    let user = db::users::find_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(CurrentUserResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}
