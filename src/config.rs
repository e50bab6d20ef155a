//! Application configuration loaded from environment variables.
//!
//! Service-level settings are read once at startup. The OAuth bundle is
//! validated on every authorize/callback request instead, so a deployment
//! with incomplete OAuth settings still serves the stats endpoints.

use std::env;
use std::time::Duration;

const DEFAULT_DASHBOARD_URL: &str = "https://brahma-tech.github.io/servers.html";
const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord OAuth / bot settings (validated per request)
    pub oauth: OAuthSettings,
    /// Dashboard page the callback redirects to
    pub dashboard_url: url::Url,
    /// Shape of the payload appended to the dashboard redirect
    pub redirect_payload: PayloadShape,
    /// Discord API root, without trailing slash
    pub discord_api_base: String,
    /// Bound applied to every outbound call
    pub upstream_timeout: Duration,
    /// GCP project holding the Firestore database
    pub firebase_project_id: String,
    /// Inline service account, when not using application default credentials
    pub firebase_credentials: Option<FirebaseCredentials>,
    /// Server port
    pub port: u16,
}

/// Raw OAuth settings as read from the environment.
///
/// Every value is optional here; [`OAuthSettings::validate`] decides whether
/// the bundle is usable.
#[derive(Clone, Default)]
pub struct OAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub bot_token: Option<String>,
}

impl std::fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("redirect_uri", &self.redirect_uri)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A validated OAuth bundle. Only obtainable through [`OAuthSettings::validate`].
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: url::Url,
    pub bot_token: String,
}

/// Service account used to reach Firestore outside of GCP.
#[derive(Clone)]
pub struct FirebaseCredentials {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
}

impl std::fmt::Debug for FirebaseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseCredentials")
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

/// What the callback sends back to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadShape {
    /// `{ mutualServers }`
    #[default]
    Mutual,
    /// `{ token, tokenType, user, servers }`
    Full,
}

impl std::str::FromStr for PayloadShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mutual" => Ok(PayloadShape::Mutual),
            "full" => Ok(PayloadShape::Full),
            other => Err(ConfigError::Invalid {
                name: "REDIRECT_PAYLOAD",
                reason: format!("expected 'mutual' or 'full', got '{}'", other),
            }),
        }
    }
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            oauth: OAuthSettings {
                client_id: Some("test_client_id".to_string()),
                client_secret: Some("test_secret".to_string()),
                redirect_uri: Some("http://localhost:8080/api/callback".to_string()),
                bot_token: Some("test_bot_token".to_string()),
            },
            dashboard_url: url::Url::parse("http://localhost:5173/servers.html")
                .expect("static test URL"),
            redirect_payload: PayloadShape::Mutual,
            discord_api_base: "http://127.0.0.1:9".to_string(),
            upstream_timeout: Duration::from_secs(5),
            firebase_project_id: "test-project".to_string(),
            firebase_credentials: None,
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let dashboard_url = optional("DASHBOARD_URL")
            .unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string());
        let dashboard_url = parse_http_url(&dashboard_url).map_err(|reason| ConfigError::Invalid {
            name: "DASHBOARD_URL",
            reason,
        })?;

        let redirect_payload = match optional("REDIRECT_PAYLOAD") {
            Some(v) => v.parse()?,
            None => PayloadShape::default(),
        };

        let upstream_timeout = match optional("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "UPSTREAM_TIMEOUT_SECS",
                        reason: format!("expected a positive integer, got '{}'", v),
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let firebase_credentials = match (
            optional("FIREBASE_CLIENT_EMAIL"),
            optional("FIREBASE_PRIVATE_KEY"),
        ) {
            (Some(client_email), Some(private_key)) => Some(FirebaseCredentials {
                client_email,
                // Keys pasted into env files usually carry literal "\n"
                private_key: private_key.replace("\\n", "\n"),
                private_key_id: optional("FIREBASE_PRIVATE_KEY_ID"),
            }),
            _ => None,
        };

        Ok(Self {
            oauth: OAuthSettings {
                client_id: optional("CLIENT_ID"),
                client_secret: optional("CLIENT_SECRET"),
                redirect_uri: optional("REDIRECT_URI"),
                bot_token: optional("BOT_TOKEN"),
            },
            dashboard_url,
            redirect_payload,
            discord_api_base: optional("DISCORD_API_BASE")
                .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            upstream_timeout,
            firebase_project_id: optional("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|| "local-dev".to_string()),
            firebase_credentials,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }
}

impl OAuthSettings {
    /// Check that every OAuth value is present and that the redirect URI is
    /// an absolute http(s) URL.
    ///
    /// Performs no I/O; callers run it before any outbound request.
    pub fn validate(&self) -> Result<OAuthCredentials, ConfigError> {
        let client_id = required(&self.client_id, "CLIENT_ID")?;
        let client_secret = required(&self.client_secret, "CLIENT_SECRET")?;
        let redirect_uri = required(&self.redirect_uri, "REDIRECT_URI")?;
        let bot_token = required(&self.bot_token, "BOT_TOKEN")?;

        let redirect_uri =
            parse_http_url(redirect_uri).map_err(ConfigError::InvalidRedirectUri)?;

        Ok(OAuthCredentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri,
            bot_token: bot_token.to_string(),
        })
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_http_url(raw: &str) -> Result<url::Url, String> {
    let parsed = url::Url::parse(raw).map_err(|e| format!("'{}' is not a URL: {}", raw, e))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        "http" | "https" => Err(format!("'{}' has no host", raw)),
        scheme => Err(format!("'{}' uses unsupported scheme '{}'", raw, scheme)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("REDIRECT_URI must be an absolute URL: {0}")]
    InvalidRedirectUri(String),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
