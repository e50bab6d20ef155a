// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ConfigError;

/// Which upstream call failed while resolving memberships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    UserGuilds,
    BotGuilds,
    UserProfile,
}

impl FetchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchSource::UserGuilds => "user_guilds",
            FetchSource::BotGuilds => "bot_guilds",
            FetchSource::UserProfile => "user_profile",
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Token exchange rejected. `provider_error` is the provider's short
    /// error code (e.g. `invalid_grant`), never the full body.
    #[error("Token exchange failed (status {status:?}, error {provider_error:?})")]
    UpstreamAuth {
        status: Option<u16>,
        provider_error: Option<String>,
    },

    #[error("Discord fetch failed: {} (status {status:?})", .endpoint.as_str())]
    UpstreamFetch {
        endpoint: FetchSource,
        status: Option<u16>,
    },

    #[error("Invalid request: {0}")]
    InvalidArgument(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Configuration(err) => {
                tracing::error!(error = %err, "Configuration error");
                let message = match err {
                    ConfigError::InvalidRedirectUri(_) => "REDIRECT_URI must be an absolute URL",
                    _ => "Missing environment variables",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string(), None)
            }
            AppError::UpstreamAuth {
                status,
                provider_error,
            } => (
                StatusCode::BAD_REQUEST,
                "Token exchange failed".to_string(),
                Some(json!({ "status": status, "providerError": provider_error })),
            ),
            AppError::UpstreamFetch { endpoint, status } => (
                StatusCode::BAD_REQUEST,
                "Failed to fetch Discord data".to_string(),
                Some(json!({ "source": endpoint.as_str(), "status": status })),
            ),
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                    Some(Value::String("Stats store unavailable".to_string())),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
