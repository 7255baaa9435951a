//! Run configuration.
//!
//! The runner takes an explicit immutable [`Config`] rather than reading
//! process-wide constants, so parallel or test-isolated runs can use
//! different targets. Loading priority: explicit `--config` path >
//! `~/.config/pvr/config.toml` > built-in defaults; CLI flags are merged on
//! top by the binary's settings layer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PvrError, Result};
use crate::route::{default_routes, Route};
use crate::selectors::SelectorSet;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Origin of the storefront under test (e.g., "https://shop.example.com").
    #[serde(alias = "base_url")]
    pub base_url: String,
    /// Directory for captured screenshots; created if absent.
    #[serde(alias = "screenshot_dir")]
    pub screenshot_dir: PathBuf,
    /// Session viewport, also restored after the responsive probe.
    pub viewport: Viewport,
    /// Whether to GET the base URL before launching the browser.
    pub preflight: bool,
    pub timeouts: Timeouts,
    pub delays: Delays,
    pub routes: Vec<Route>,
    pub selectors: SelectorSet,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeouts {
    /// Page navigation timeout.
    #[serde(with = "humantime_serde")]
    pub navigation: Duration,
    /// Wait for the network to go idle after navigation.
    #[serde(alias = "network_idle", with = "humantime_serde")]
    pub network_idle: Duration,
    /// Wall-clock guard on any single driver command.
    #[serde(with = "humantime_serde")]
    pub command: Duration,
    #[serde(with = "humantime_serde")]
    pub preflight: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            network_idle: Duration::from_secs(10),
            command: Duration::from_secs(45),
            preflight: Duration::from_secs(10),
        }
    }
}

/// Fixed settle waits inserted after navigations and interactions.
///
/// These preserve the sleep-based settling of the target workflow; tune or
/// zero them per site rather than relying on hidden condition polling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Delays {
    /// After navigating a route, before assertions.
    #[serde(alias = "page_settle", with = "humantime_serde")]
    pub page_settle: Duration,
    /// After navigating in a functional probe.
    #[serde(alias = "probe_settle", with = "humantime_serde")]
    pub probe_settle: Duration,
    /// After reloading under a responsive preset.
    #[serde(alias = "responsive_settle", with = "humantime_serde")]
    pub responsive_settle: Duration,
    /// After clicking the theme toggle.
    #[serde(alias = "toggle_settle", with = "humantime_serde")]
    pub toggle_settle: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            page_settle: Duration::from_secs(1),
            probe_settle: Duration::from_secs(2),
            responsive_settle: Duration::from_secs(1),
            toggle_settle: Duration::from_millis(500),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            screenshot_dir: std::env::temp_dir().join("pvr-screenshots"),
            viewport: Viewport::default(),
            preflight: true,
            timeouts: Timeouts::default(),
            delays: Delays::default(),
            routes: default_routes(),
            selectors: SelectorSet::default(),
        }
    }
}

impl Config {
    /// Load from an explicit path, the central config, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let chosen = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::central_config_path().filter(|p| p.exists()),
        };

        match chosen {
            Some(p) => {
                let raw = std::fs::read_to_string(&p).map_err(|e| {
                    PvrError::Config(format!("Failed to read config {}: {}", p.display(), e))
                })?;
                toml::from_str(&raw).map_err(|e| {
                    PvrError::Config(format!("Invalid config ({}): {}", p.display(), e))
                })
            }
            None => Ok(Self::default()),
        }
    }

    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config").join("pvr").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.is_empty() {
            let url = Url::parse(&self.base_url).map_err(|e| {
                PvrError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(PvrError::Config(format!(
                    "base URL must use http or https, got '{}'",
                    url.scheme()
                )));
            }
        }
        if self.routes.is_empty() {
            return Err(PvrError::Config("route list is empty".to_string()));
        }
        if self.timeouts.navigation.is_zero() || self.timeouts.command.is_zero() {
            return Err(PvrError::Config(
                "navigation and command timeouts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Require a non-empty base URL; invoked by the run path after merging
    /// CLI flags (the `routes` subcommand does not need one).
    pub fn require_base_url(&self) -> Result<&str> {
        if self.base_url.is_empty() {
            return Err(PvrError::Config(
                "base URL is required; pass --base-url or set base_url in the config".to_string(),
            ));
        }
        Ok(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();
        assert!(cfg.base_url.is_empty());
        assert_eq!(cfg.viewport.width, 1280);
        assert_eq!(cfg.viewport.height, 720);
        assert!(cfg.preflight);
        assert_eq!(cfg.timeouts.navigation, Duration::from_secs(30));
        assert_eq!(cfg.timeouts.network_idle, Duration::from_secs(10));
        assert_eq!(cfg.timeouts.command, Duration::from_secs(45));
        assert_eq!(cfg.delays.page_settle, Duration::from_secs(1));
        assert_eq!(cfg.delays.probe_settle, Duration::from_secs(2));
        assert_eq!(cfg.delays.toggle_settle, Duration::from_millis(500));
        assert_eq!(cfg.routes.len(), 8);
    }

    #[test]
    fn parses_toml_with_humane_durations() {
        let cfg: Config = toml::from_str(
            r#"
base_url = "https://shop.example.com"
screenshot_dir = "/tmp/shots"

[timeouts]
navigation = "20s"
network_idle = "5s"

[delays]
page_settle = "250ms"
toggle_settle = "0s"

[[routes]]
path = "/en/shop"
name = "shop_en"
description = "Shop Page (English)"
"#,
        )
        .unwrap();

        assert_eq!(cfg.base_url, "https://shop.example.com");
        assert_eq!(cfg.screenshot_dir, PathBuf::from("/tmp/shots"));
        assert_eq!(cfg.timeouts.navigation, Duration::from_secs(20));
        assert_eq!(cfg.timeouts.network_idle, Duration::from_secs(5));
        // Unset durations keep their defaults.
        assert_eq!(cfg.timeouts.command, Duration::from_secs(45));
        assert_eq!(cfg.delays.page_settle, Duration::from_millis(250));
        assert_eq!(cfg.delays.toggle_settle, Duration::ZERO);
        assert_eq!(cfg.delays.probe_settle, Duration::from_secs(2));
        assert_eq!(cfg.routes.len(), 1);
        assert_eq!(cfg.routes[0].name, "shop_en");
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let cfg = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            base_url: "ftp://shop.example.com".to_string(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_routes_and_zero_timeouts() {
        let cfg = Config {
            routes: Vec::new(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.timeouts.navigation = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_base_url_passes_validate_but_fails_require() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.require_base_url().is_err());

        let cfg = Config {
            base_url: "https://shop.example.com".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.require_base_url().unwrap(), "https://shop.example.com");
    }

    #[test]
    fn load_returns_defaults_without_path() {
        // No explicit path and (in CI) typically no central config: either
        // way the result must be a usable config.
        let cfg = Config::load(None).unwrap();
        assert!(!cfg.routes.is_empty());
    }
}
