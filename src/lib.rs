//! Page Verification Runner (PVR) Library
//!
//! A library for smoke-testing a live web storefront with a headless
//! browser: page availability, rendering, English/Arabic localization with
//! RTL layout, dark-mode toggling, and shop/product UI affordances, with
//! screenshots captured along the way.
//!
//! # Module Overview
//!
//! - [`browser`] - Headless browser session and driver protocol
//! - [`runner`] - The verification run: route visits and functional probes
//! - [`config`] - Configuration file support
//! - [`route`] - Route descriptors for the pages under test
//! - [`selectors`] - Pluggable selector heuristics
//! - [`report`] - Result model and output schemas
//!
//! # Example
//!
//! ```no_run
//! use pvr_lib::{Config, Runner};
//!
//! # async fn example() -> pvr_lib::Result<()> {
//! let config = Config {
//!     base_url: "https://shop.example.com".to_string(),
//!     ..Config::default()
//! };
//! let report = Runner::new(config).run().await?;
//! println!("{}/{} checks passed", report.summary.passed, report.summary.total);
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod report;
pub mod route;
pub mod runner;
pub mod selectors;
pub mod viewport;

// Browser module re-exports
pub use browser::{
    BrowserSession, MockPage, MockSite, SessionOptions, DEFAULT_COMMAND_TIMEOUT,
    DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT, MOCK_SITE_ENV,
};
pub use config::{Config, Delays, Timeouts};
pub use error::{ErrorCategory, ErrorPayload, PvrError, Result};
pub use report::{
    CheckOutcome, ErrorOutput, PageResult, ProbeResult, PvrOutput, RoutesOutput, RunRecord,
    RunReport, Summary, MIN_BODY_TEXT_CHARS, PVR_OUTPUT_VERSION,
};
pub use route::{default_routes, Route};
pub use runner::{ProgressCallback, Runner};
pub use selectors::SelectorSet;
pub use viewport::{Viewport, ViewportPreset, RESPONSIVE_PRESETS};
