//! Authentication API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use vitatrack_shared::types::{
    AuthTokens, LoginRequest, RefreshTokenRequest, RegisterRequest, UserProfile,
};

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me))
}

/// POST /api/v1/auth/register - Create an account
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::register(
        state.db(),
        state.jwt(),
        &req.email,
        &req.password,
        req.gender.as_deref(),
    )
    .await?;

    Ok(Json(tokens))
}

/// POST /api/v1/auth/login - Authenticate
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::login(state.db(), state.jwt(), &req.email, &req.password).await?;

    Ok(Json(tokens))
}

/// POST /api/v1/auth/refresh - Exchange a refresh token
async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::refresh(state.db(), state.jwt(), &req.refresh_token).await?;

    Ok(Json(tokens))
}

/// GET /api/v1/auth/me - Current user profile
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::profile(state.db(), auth.user_id).await?;

    Ok(Json(profile))
}
