// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Discord OAuth login routes.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::Result;
use crate::services::redirect::encode_redirect;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", get(login))
        .route("/api/callback", get(callback))
}

/// 302 Found, which is what the dashboard and Discord expect for OAuth hops.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Start OAuth flow - redirect to Discord authorization.
async fn login(State(state): State<Arc<AppState>>) -> Result<Response> {
    let creds = state.config.oauth.validate()?;
    let auth_url = state.discord.client().authorize_url(&creds);

    tracing::info!(
        client_id = %creds.client_id,
        "Starting OAuth flow, redirecting to Discord"
    );

    Ok(found(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
}

/// OAuth callback - exchange code, resolve mutual guilds, hand off to the dashboard.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    let Some(code) = params.code.filter(|c| !c.trim().is_empty()) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No code provided" })),
        )
            .into_response());
    };

    // Configuration problems must surface before any request leaves the process
    let creds = state.config.oauth.validate()?;

    tracing::info!("Exchanging authorization code and resolving mutual guilds");
    let resolution = state.discord.resolve_mutual_guilds(&creds, &code).await?;

    let json = resolution.to_json(state.config.redirect_payload)?;
    let location = encode_redirect(&state.config.dashboard_url, &json);

    tracing::info!(
        mutual = resolution.mutual_guilds.len(),
        payload = ?state.config.redirect_payload,
        "OAuth successful, redirecting to dashboard"
    );

    Ok(found(&location))
}
