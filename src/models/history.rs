//! Daily time series for a single member.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::lenient;

/// History document kept by the bot's voice tracker.
///
/// Stored at: `vc_stats/{guild_id}_{user_id}`. Keys are date strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceHistory {
    #[serde(default, deserialize_with = "lenient::int_map")]
    pub xp_history: BTreeMap<String, i64>,
    /// Voice minutes per day. The bot names this field `history`.
    #[serde(default, rename = "history", deserialize_with = "lenient::int_map")]
    pub vc_history: BTreeMap<String, i64>,
}

/// `user-history` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub xp_history: BTreeMap<String, i64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub vc_history: BTreeMap<String, i64>,
}

impl From<VoiceHistory> for HistoryResponse {
    fn from(history: VoiceHistory) -> Self {
        Self {
            xp_history: history.xp_history,
            vc_history: history.vc_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stored_history_field_maps_to_vc_history() {
        let doc: VoiceHistory = serde_json::from_value(json!({
            "xpHistory": { "2025-01-02": 40, "2025-01-01": 15.0 },
            "history": { "2025-01-01": 30 }
        }))
        .unwrap();

        let body = serde_json::to_value(HistoryResponse::from(doc)).unwrap();
        assert_eq!(
            body,
            json!({
                "xpHistory": { "2025-01-01": 15, "2025-01-02": 40 },
                "vcHistory": { "2025-01-01": 30 }
            })
        );
    }
}
