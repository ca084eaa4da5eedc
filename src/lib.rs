//! worksite-api library
//!
//! Project/worker time-tracking backend: projects, workers, assignment, a
//! clock-in/clock-out state machine with timezone-aware duration
//! computation, login, and a keyword lookup responder.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod openapi;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Raised when no CORS origin policy can be derived from configuration.
#[derive(Debug, thiserror::Error)]
#[error("missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true")]
pub struct MissingCorsConfig;

/// Builds the CORS layer from configuration.
///
/// Explicit origins get explicit method and header lists: tower-http rejects
/// wildcard methods/headers combined with `Access-Control-Allow-Credentials`
/// by panicking on the first request, so `Any` is never used on this path.
/// Without explicit origins, development (or an explicit any-origin opt-in)
/// falls back to the permissive layer, which never allows credentials.
pub fn build_cors_layer(cfg: &config::AppConfig) -> Result<CorsLayer, MissingCorsConfig> {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(cfg.cors_allow_credentials))
    } else if cfg.should_allow_permissive_cors() {
        info!("Using permissive CORS because explicit origins were not configured");
        Ok(CorsLayer::permissive())
    } else {
        Err(MissingCorsConfig)
    }
}

/// Root banner used as a trivial reachability probe.
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Backend running successfully" }))
}

/// Top-level routes: banner and health probe
pub fn root_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health::health))
}

/// The versioned API surface
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/chatbot", post(handlers::lookup::chatbot))
        .nest("/projects", handlers::projects::project_routes())
        .nest("/workers", handlers::workers::worker_routes())
        .nest("/queries", handlers::queries::query_routes())
        .merge(handlers::time_clock::time_clock_routes())
}
