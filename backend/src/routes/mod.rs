//! Route definitions for the VitaTrack API
//!
//! This module organizes all API routes and applies middleware.

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

mod achievements;
mod activity;
mod analysis;
mod auth;
mod goals;
mod health;
mod metrics;

#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod goals_tests;

pub use achievements::achievements_routes;
pub use activity::activity_routes;
pub use analysis::analysis_routes;
pub use auth::auth_routes;
pub use goals::goals_routes;
pub use metrics::metrics_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
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

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "VitaTrack API v1" }))
        .nest("/auth", auth_routes())
        .nest("/goals", goals_routes())
        .nest("/achievements", achievements_routes())
        .nest("/activity", activity_routes())
        .nest("/metrics", metrics_routes())
        .nest("/analysis", analysis_routes())
}
