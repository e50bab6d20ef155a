// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod stats;

use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// The dashboard's own origin, or a local dev server on any port.
fn is_allowed_origin(origin: &str, dashboard_origin: &str) -> bool {
    if origin == dashboard_origin {
        return true;
    }
    let Ok(parsed) = url::Url::parse(origin) else {
        return false;
    };
    parsed.scheme() == "http"
        && matches!(parsed.host_str(), Some("localhost") | Some("127.0.0.1"))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow the dashboard origin and localhost (for dev)
    let dashboard_origin = state.config.dashboard_url.origin().ascii_serialization();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                is_allowed_origin(origin.to_str().unwrap_or(""), &dashboard_origin)
            },
        ))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(stats::routes())
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASHBOARD: &str = "https://brahma-tech.github.io";

    #[test]
    fn test_allowed_origins() {
        assert!(is_allowed_origin(DASHBOARD, DASHBOARD));
        assert!(is_allowed_origin("http://localhost", DASHBOARD));
        assert!(is_allowed_origin("http://localhost:5173", DASHBOARD));
        assert!(is_allowed_origin("http://127.0.0.1:8080", DASHBOARD));
    }

    #[test]
    fn test_lookalike_origins_rejected() {
        assert!(!is_allowed_origin("http://localhost.evil.example", DASHBOARD));
        assert!(!is_allowed_origin("http://localhost.evil.example:5173", DASHBOARD));
        assert!(!is_allowed_origin("http://127.0.0.1.nip.io", DASHBOARD));
        assert!(!is_allowed_origin("https://brahma-tech.github.io.evil.example", DASHBOARD));
        assert!(!is_allowed_origin("null", DASHBOARD));
        assert!(!is_allowed_origin("", DASHBOARD));
    }
}
