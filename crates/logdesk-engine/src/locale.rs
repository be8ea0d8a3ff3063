//! User-facing strings that depend on the display language.

use serde::{Deserialize, Serialize};

/// Display language for synthesized transcript entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// Traditional Chinese.
    #[default]
    ZhTw,
    /// English.
    En,
}

impl Locale {
    /// Text shown in place of an assistant reply when a request fails.
    pub fn request_failed(self, reason: &str) -> String {
        match self {
            Self::ZhTw => format!("發送請求失敗：{reason}"),
            Self::En => format!("Request failed: {reason}"),
        }
    }
}
