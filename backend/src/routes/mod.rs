//! Route definitions for the clinic API
//!
//! This module organizes all API routes and applies middleware. The
//! configured `server.role` decides which routers are mounted.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod health;
mod patients;


pub use auth::auth_routes;
pub use patients::patient_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .merge(api_routes(&state))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes for the configured role
fn api_routes(state: &AppState) -> Router<AppState> {
    let role = state.config().server.role;
    let mut router = Router::new()
        .route("/api", get(api_banner))
        .route("/api/", get(api_banner));

    if role.serves_auth() {
        router = router.merge(auth::auth_routes());
    }
    if role.serves_patients() {
        router = router.merge(patients::patient_routes());
    }

    router
}

async fn api_banner() -> &'static str {
    "Clinic API"
}
