//! Discord identity models: access tokens, guild memberships, user profile.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// OAuth access token obtained for the duration of one callback request.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub token_type: String,
}

impl AccessToken {
    /// Value for the `Authorization` header, e.g. `Bearer abc`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.value)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// One guild a principal belongs to, as returned by `/users/@me/guilds`.
///
/// Fields other than `id`, `name` and `icon` are carried through untouched
/// so the dashboard sees the same object Discord returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Guild {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub extra: Map<String, Value>,
}

impl Guild {
    /// Guild with only an id, mostly useful in tests.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            icon: None,
            extra: Map::new(),
        }
    }
}

/// Authenticated user profile from `/users/@me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DiscordUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_guild_keeps_unknown_fields() {
        let raw = json!({
            "id": "81384788765712384",
            "name": "Discord API",
            "icon": null,
            "owner": false,
            "permissions": "104188992",
            "features": ["COMMUNITY"]
        });

        let guild: Guild = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(guild.id, "81384788765712384");
        assert_eq!(guild.extra.get("permissions"), Some(&json!("104188992")));

        assert_eq!(serde_json::to_value(&guild).unwrap(), raw);
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken {
            value: "tok1".to_string(),
            token_type: "Bearer".to_string(),
        };
        assert_eq!(token.authorization(), "Bearer tok1");
        assert!(!format!("{:?}", token).contains("tok1"));
    }
}
