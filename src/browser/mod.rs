//! Browser automation for the verification run.
//!
//! Pages are driven through Playwright via Node.js: a single long-lived
//! driver process hosts the browser, context, and page, and executes JSON
//! commands from stdin (one per line). Tests swap in an in-process mock
//! driver speaking the same protocol.
//!
//! # Module Structure
//!
//! - [`session`] - Session lifecycle and typed command wrappers
//! - [`protocol`] - Wire protocol types
//! - [`playwright`] - Driver script and availability checks
//! - [`mock`] - Virtual-storefront driver for tests/CI

pub mod mock;
mod playwright;
pub mod protocol;
mod session;

pub use mock::{MockPage, MockSite, MOCK_SITE_ENV};
pub use session::{
    BrowserSession, SessionOptions, DEFAULT_COMMAND_TIMEOUT, DEFAULT_NAVIGATION_TIMEOUT,
    DEFAULT_NETWORK_IDLE_TIMEOUT,
};
