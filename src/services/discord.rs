// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Discord API client for the dashboard login flow.
//!
//! Handles:
//! - Authorization-code exchange
//! - Guild listing as the user (OAuth token) and as the bot (bot token)
//! - User profile lookup
//! - Mutual guild resolution with concurrent fetches

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{Config, OAuthCredentials, PayloadShape};
use crate::error::{AppError, FetchSource};
use crate::models::{AccessToken, DiscordUser, Guild};
use crate::services::guilds::intersect;
use crate::services::redirect::Resolution;

/// OAuth scopes the dashboard needs.
pub const OAUTH_SCOPES: &str = "identify guilds";

/// Discord API client.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
}

impl DiscordClient {
    /// Create a client against `base_url`, with every request bounded by `timeout`.
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL the login endpoint redirects the browser to.
    pub fn authorize_url(&self, creds: &OAuthCredentials) -> String {
        format!(
            "{}/oauth2/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.base_url,
            urlencoding::encode(&creds.client_id),
            urlencoding::encode(creds.redirect_uri.as_str()),
            urlencoding::encode(OAUTH_SCOPES),
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        creds: &OAuthCredentials,
        code: &str,
    ) -> Result<AccessToken, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth2/token", self.base_url))
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", creds.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "Token exchange request failed");
                AppError::UpstreamAuth {
                    status: None,
                    provider_error: Some(transport_error(&e).to_string()),
                }
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: TokenExchangeResponse = serde_json::from_str(&body).unwrap_or_default();

        match parsed {
            TokenExchangeResponse {
                access_token: Some(value),
                token_type,
                error: None,
                ..
            } if status.is_success() => Ok(AccessToken {
                value,
                token_type: token_type
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "Bearer".to_string()),
            }),
            parsed => {
                // Provider bodies can echo request parameters, so they stay in the logs
                tracing::warn!(
                    status = status.as_u16(),
                    body = %body,
                    "Discord rejected token exchange"
                );
                Err(AppError::UpstreamAuth {
                    status: Some(status.as_u16()),
                    provider_error: parsed.error,
                })
            }
        }
    }

    /// Guilds the authenticated user belongs to.
    pub async fn user_guilds(&self, token: &AccessToken) -> Result<Vec<Guild>, AppError> {
        self.get_json(
            "/users/@me/guilds",
            &token.authorization(),
            FetchSource::UserGuilds,
        )
        .await
    }

    /// Guilds the bot belongs to.
    pub async fn bot_guilds(&self, bot_token: &str) -> Result<Vec<Guild>, AppError> {
        self.get_json(
            "/users/@me/guilds",
            &format!("Bot {}", bot_token),
            FetchSource::BotGuilds,
        )
        .await
    }

    /// Profile of the authenticated user.
    pub async fn current_user(&self, token: &AccessToken) -> Result<DiscordUser, AppError> {
        self.get_json("/users/@me", &token.authorization(), FetchSource::UserProfile)
            .await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        authorization: &str,
        endpoint: FetchSource,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    timeout = e.is_timeout(),
                    endpoint = endpoint.as_str(),
                    "Discord request failed"
                );
                AppError::UpstreamFetch {
                    endpoint,
                    status: None,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                tracing::warn!(endpoint = endpoint.as_str(), "Discord rate limit hit (429)");
            }
            tracing::warn!(
                status = status.as_u16(),
                endpoint = endpoint.as_str(),
                body = %body,
                "Discord fetch rejected"
            );
            return Err(AppError::UpstreamFetch {
                endpoint,
                status: Some(status.as_u16()),
            });
        }

        response.json().await.map_err(|e| {
            tracing::warn!(error = %e, endpoint = endpoint.as_str(), "Discord JSON parse error");
            AppError::UpstreamFetch {
                endpoint,
                status: Some(status.as_u16()),
            }
        })
    }
}

fn transport_error(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else {
        "unreachable"
    }
}

/// Token endpoint response; success and error bodies share this shape.
#[derive(Debug, Default, Deserialize)]
struct TokenExchangeResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    error: Option<String>,
    #[allow(dead_code)]
    error_description: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// DiscordService - login flow orchestration
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves a callback code into the user's mutual guilds.
#[derive(Clone)]
pub struct DiscordService {
    client: DiscordClient,
    shape: PayloadShape,
}

impl DiscordService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            client: DiscordClient::new(&config.discord_api_base, config.upstream_timeout)?,
            shape: config.redirect_payload,
        })
    }

    pub fn client(&self) -> &DiscordClient {
        &self.client
    }

    /// Exchange `code`, then list user and bot guilds concurrently and keep
    /// the mutual ones. The first failing fetch aborts the whole resolution.
    pub async fn resolve_mutual_guilds(
        &self,
        creds: &OAuthCredentials,
        code: &str,
    ) -> Result<Resolution, AppError> {
        let token = self.client.exchange_code(creds, code).await?;

        let (user, user_guilds, bot_guilds) = match self.shape {
            PayloadShape::Full => {
                let (user, user_guilds, bot_guilds) = tokio::try_join!(
                    self.client.current_user(&token),
                    self.client.user_guilds(&token),
                    self.client.bot_guilds(&creds.bot_token),
                )?;
                (Some(user), user_guilds, bot_guilds)
            }
            PayloadShape::Mutual => {
                let (user_guilds, bot_guilds) = tokio::try_join!(
                    self.client.user_guilds(&token),
                    self.client.bot_guilds(&creds.bot_token),
                )?;
                (None, user_guilds, bot_guilds)
            }
        };

        let user_count = user_guilds.len();
        let mutual_guilds = intersect(user_guilds, &bot_guilds);

        tracing::info!(
            user_guilds = user_count,
            bot_guilds = bot_guilds.len(),
            mutual = mutual_guilds.len(),
            "Mutual guilds resolved"
        );

        Ok(Resolution {
            token,
            user,
            mutual_guilds,
        })
    }
}
