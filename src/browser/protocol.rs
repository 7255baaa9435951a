//! Wire protocol between the runner and the browser driver.
//!
//! Commands are serialized as one JSON object per line on the driver's
//! stdin; every command yields exactly one JSON reply line on stdout. The
//! conversation is strictly sequential, so no correlation ids are needed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DriverCommand {
    /// Navigate and wait for network idle; replies with the HTTP status.
    #[serde(rename_all = "camelCase")]
    Goto {
        url: String,
        timeout_ms: u64,
        idle_timeout_ms: u64,
    },
    /// Fixed settle delay.
    Wait { ms: u64 },
    /// Count matches for the first selector candidate with any match.
    Count { selectors: Vec<String> },
    /// Click the first element of the first matching candidate.
    ClickFirst { selectors: Vec<String> },
    /// Inner text of the first match.
    Text { selector: String },
    /// Attribute of the first match, or null.
    Attribute { selector: String, name: String },
    #[serde(rename_all = "camelCase")]
    Screenshot { path: String, full_page: bool },
    SetViewport { width: u32, height: u32 },
    IsVisible { selector: String },
    /// href attributes of all matches.
    Hrefs { selector: String },
    Close,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl DriverReply {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Payload of a successful `goto`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GotoValue {
    pub http_status: Option<u16>,
}
