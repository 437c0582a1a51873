//! Authentication routes
//!
//! Registration and login. Password hashing runs on the blocking thread
//! pool, so these handlers never stall the async runtime.

use crate::error::ApiResult;
use crate::services::AccountService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use clinic_shared::types::{AccessToken, LoginRequest, MessageResponse, RegisterRequest};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/register/", post(register))
        .route("/api/login", post(login))
        .route("/api/login/", post(login))
}

/// Register a new account
///
/// POST /api/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<MessageResponse>> {
    AccountService::register(state.accounts(), state.passwords(), &req).await?;
    Ok(Json(MessageResponse::new("User successfully registered.")))
}

/// Exchange credentials for a bearer token
///
/// POST /api/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AccessToken>> {
    let token =
        AccountService::login(state.accounts(), state.jwt(), &req.username, &req.password).await?;
    Ok(Json(token))
}
