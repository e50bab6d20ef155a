//! Dashboard redirect payloads.
//!
//! The dashboard is a static page, so the callback hands it data through a
//! `data` query parameter holding base64-encoded JSON.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::config::PayloadShape;
use crate::error::AppError;
use crate::models::{AccessToken, DiscordUser, Guild};

/// Query parameter the dashboard reads.
pub const DATA_PARAM: &str = "data";

/// Narrow payload: just the mutual guilds.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualPayload<'a> {
    pub mutual_servers: &'a [Guild],
}

/// Full payload: the session token, user profile and mutual guilds.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullPayload<'a> {
    pub token: &'a str,
    pub token_type: &'a str,
    pub user: &'a DiscordUser,
    pub servers: &'a [Guild],
}

/// Result of a successful callback, ready to be encoded.
#[derive(Debug)]
pub struct Resolution {
    pub token: AccessToken,
    /// Present when the payload shape asked for the profile.
    pub user: Option<DiscordUser>,
    pub mutual_guilds: Vec<Guild>,
}

impl Resolution {
    /// Serialize in the requested shape.
    ///
    /// Falls back to the narrow shape when no profile was fetched.
    pub fn to_json(&self, shape: PayloadShape) -> Result<Vec<u8>, AppError> {
        let bytes = match (shape, &self.user) {
            (PayloadShape::Full, Some(user)) => serde_json::to_vec(&FullPayload {
                token: &self.token.value,
                token_type: &self.token.token_type,
                user,
                servers: &self.mutual_guilds,
            }),
            _ => serde_json::to_vec(&MutualPayload {
                mutual_servers: &self.mutual_guilds,
            }),
        };
        bytes.map_err(|e| AppError::Internal(anyhow::anyhow!("Payload encoding failed: {}", e)))
    }
}

/// Append `?data=<base64 json>` to the dashboard URL.
pub fn encode_redirect(dashboard_url: &url::Url, json: &[u8]) -> String {
    let mut target = dashboard_url.clone();
    target
        .query_pairs_mut()
        .append_pair(DATA_PARAM, &STANDARD.encode(json));
    target.into()
}
