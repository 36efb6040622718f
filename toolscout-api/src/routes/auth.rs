/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - Create account
/// - `POST /api/login` - Password login, returns a 30-minute session token
/// - `GET /api/me` - Current user (requires bearer token)
///
/// Login deliberately returns one generic 401 for both an unknown username
/// and a wrong password, so the endpoint cannot be used to enumerate valid
/// usernames through response-shape differences.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use toolscout_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (case-sensitive, unique)
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    /// Email address (case-sensitive, unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (stored only as an Argon2id hash)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token (30 minute TTL)
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Register a new user
///
/// # Errors
///
/// - `409 Conflict`: Username or email already registered. Checked with a
///   single combined query; the unique indexes settle concurrent races.
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<User>> {
    req.validate().map_err(ApiError::from_validation)?;

    if User::username_or_email_taken(&state.db, &req.username, &req.email).await? {
        return Err(ApiError::Conflict(
            "Username or email already registered".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Registered new user");

    Ok(Json(user))
}

/// Password login
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown username or wrong password, same body for
///   both
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let invalid = || ApiError::Unauthorized("Incorrect username or password".to_string());

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(invalid)?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(invalid());
    }

    let claims = jwt::Claims::new(&user.username);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Returns the authenticated user
///
/// The `User` extension is injected by the auth middleware; the password
/// hash is skipped during serialization.
pub async fn me(Extension(user): Extension<User>) -> ApiResult<Json<User>> {
    Ok(Json(user))
}
