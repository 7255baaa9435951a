use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum PvrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Browser driver error: {0}")]
    Browser(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl PvrError {
    pub fn browser(message: impl Into<String>) -> Self {
        PvrError::Browser(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            PvrError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions (e.g., the screenshot directory).",
            ),
            PvrError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and that the base URL is reachable; pass --no-preflight to skip the reachability check.",
            ),
            PvrError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify the base URL format (e.g., https://shop.example.com).",
            ),
            PvrError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON inputs (mock site fixture, report output); run with --verbose for details.",
            ),
            PvrError::Browser(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("cannot find module 'playwright'") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Install Playwright (e.g., `npm install playwright` and `npx playwright install chromium`).",
                    )
                } else if lower.contains("chromium executable") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Run `npx playwright install chromium` (or `playwright install chromium`) to download the browser.",
                    )
                } else if lower.contains("not found on path") || lower.contains("node command") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Install Node.js and ensure the node binary is on PATH; rerun after installing Playwright if needed.",
                    )
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Try increasing --nav-timeout/--network-idle-timeout or --command-timeout, and ensure the page finishes loading.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Re-run with --verbose to see the driver conversation; check the target site is up.",
                    )
                }
            }
            PvrError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("base url") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Pass --base-url https://shop.example.com or set base_url in the config file.",
                    )
                } else if lower.contains("viewport") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use WIDTHxHEIGHT (e.g., --viewport 1280x720).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file; run with --verbose for the effective config.",
                    )
                }
            }
            PvrError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, PvrError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Browser,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_payload_includes_playwright_remediation() {
        let err = PvrError::Browser(
            "Cannot find module 'playwright'; install with `npm install playwright`.".to_string(),
        );
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Browser);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("npm install playwright"),
            "expected remediation to mention npm install playwright, got: {remediation}"
        );
    }

    #[test]
    fn browser_payload_includes_node_install_hint() {
        let err = PvrError::Browser(
            "Unable to spawn the browser driver; 'node' was not found on PATH".to_string(),
        );
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.to_ascii_lowercase().contains("node"),
            "expected node install/path remediation, got: {remediation}"
        );
    }

    #[test]
    fn browser_payload_includes_timeout_hint() {
        let err = PvrError::Browser("driver timed out after 45s".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("--nav-timeout") || remediation.contains("--command-timeout"),
            "expected CLI timeout hint, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_includes_base_url_hint() {
        let err = PvrError::Config("base URL is required".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("--base-url"),
            "expected base URL remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = PvrError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("config file"),
            "expected default remediation for generic config errors, got: {remediation}"
        );
    }

    #[test]
    fn network_payload_mentions_preflight_skip() {
        let payload = ErrorPayload::new(
            ErrorCategory::Network,
            "connection refused".to_string(),
            "Check connectivity; pass --no-preflight to skip the reachability check.",
        );
        assert_eq!(payload.category, ErrorCategory::Network);
        assert!(payload.remediation.unwrap().contains("--no-preflight"));
    }
}
