//! In-process mock driver for tests and CI.
//!
//! When `PVR_MOCK_SITE` points at a JSON fixture, the session answers the
//! wire protocol from a virtual storefront instead of spawning Playwright:
//! navigations match fixture pages by URL substring, selector lookups read
//! fixture counts, and screenshots are written as placeholder PNGs so
//! file-existence checks still hold. Waits are no-ops to keep tests fast.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Deserialize;
use serde_json::{json, Value};

use super::protocol::DriverCommand;
use crate::error::{PvrError, Result};

/// Environment variable pointing at a mock site fixture (JSON).
pub const MOCK_SITE_ENV: &str = "PVR_MOCK_SITE";

pub(crate) fn mock_site_path() -> Option<PathBuf> {
    std::env::var(MOCK_SITE_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// A virtual storefront: pages matched against navigated URLs in order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockSite {
    pub pages: Vec<MockPage>,
    /// Make every screenshot command fail, to exercise error paths.
    #[serde(alias = "fail_screenshots")]
    pub fail_screenshots: bool,
}

impl MockSite {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PvrError::Config(format!(
                "Failed to read mock site fixture {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            PvrError::Config(format!(
                "Invalid mock site fixture {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockPage {
    /// Substring matched against the navigated URL (first match wins).
    pub path: String,
    #[serde(alias = "http_status")]
    pub http_status: u16,
    /// Root element `dir` attribute, if any.
    pub dir: Option<String>,
    #[serde(alias = "body_text")]
    pub body_text: String,
    /// Exact selector string -> match count.
    #[serde(alias = "selector_counts")]
    pub selector_counts: HashMap<String, u64>,
    /// Exact selector string -> href attributes returned for it.
    pub hrefs: HashMap<String, Vec<String>>,
}

impl Default for MockPage {
    fn default() -> Self {
        Self {
            path: String::new(),
            http_status: 200,
            dir: None,
            body_text: String::new(),
            selector_counts: HashMap::new(),
            hrefs: HashMap::new(),
        }
    }
}

/// Answers driver commands from a [`MockSite`].
#[derive(Debug)]
pub(crate) struct MockDriver {
    site: MockSite,
    current: Option<usize>,
}

impl MockDriver {
    pub fn new(site: MockSite) -> Self {
        Self {
            site,
            current: None,
        }
    }

    pub fn apply(&mut self, command: &DriverCommand) -> Result<Option<Value>> {
        match command {
            DriverCommand::Goto { url, .. } => {
                self.current = self
                    .site
                    .pages
                    .iter()
                    .position(|p| !p.path.is_empty() && url.contains(&p.path));
                // Unknown URLs behave like a missing page.
                let status = self
                    .current
                    .map(|i| self.site.pages[i].http_status)
                    .unwrap_or(404);
                Ok(Some(json!({ "httpStatus": status })))
            }
            DriverCommand::Wait { .. } => Ok(Some(Value::Null)),
            DriverCommand::Count { selectors } => Ok(Some(json!(self.count(selectors)))),
            DriverCommand::ClickFirst { selectors } => Ok(Some(json!(self.count(selectors) > 0))),
            DriverCommand::Text { selector } => {
                let text = if selector == "body" {
                    self.page().map(|p| p.body_text.clone()).unwrap_or_default()
                } else {
                    String::new()
                };
                Ok(Some(Value::String(text)))
            }
            DriverCommand::Attribute { selector, name } => {
                let value = if selector == "html" && name == "dir" {
                    self.page().and_then(|p| p.dir.clone())
                } else {
                    None
                };
                Ok(Some(value.map(Value::String).unwrap_or(Value::Null)))
            }
            DriverCommand::Screenshot { path, .. } => {
                if self.site.fail_screenshots {
                    return Err(PvrError::Browser("screenshot failed (mock)".to_string()));
                }
                write_placeholder_png(Path::new(path))?;
                Ok(Some(Value::Null))
            }
            DriverCommand::SetViewport { .. } => Ok(Some(Value::Null)),
            DriverCommand::IsVisible { selector } => {
                let visible = if selector == "body" {
                    self.page().map(|p| !p.body_text.is_empty()).unwrap_or(false)
                } else {
                    self.count(std::slice::from_ref(selector)) > 0
                };
                Ok(Some(json!(visible)))
            }
            DriverCommand::Hrefs { selector } => Ok(Some(json!(self
                .page()
                .and_then(|p| p.hrefs.get(selector).cloned())
                .unwrap_or_default()))),
            DriverCommand::Close => Ok(Some(Value::Null)),
        }
    }

    fn page(&self) -> Option<&MockPage> {
        self.current.map(|i| &self.site.pages[i])
    }

    fn count(&self, selectors: &[String]) -> u64 {
        let Some(page) = self.page() else { return 0 };
        for selector in selectors {
            if let Some(&n) = page.selector_counts.get(selector) {
                if n > 0 {
                    return n;
                }
            }
        }
        0
    }
}

fn write_placeholder_png(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let img = RgbaImage::from_pixel(4, 4, image::Rgba([230, 230, 230, 255]));
    img.save(path)
        .map_err(|e| PvrError::Browser(format!("failed to write placeholder screenshot: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> MockSite {
        let mut shop = MockPage {
            path: "/en/shop".to_string(),
            body_text: "storefront body text that is comfortably long enough".to_string(),
            ..MockPage::default()
        };
        shop.selector_counts
            .insert(r#"[class*="card"]"#.to_string(), 12);
        shop.hrefs.insert(
            r#"a[href*="/shop/"]"#.to_string(),
            vec!["/en/shop/42".to_string()],
        );
        MockSite {
            pages: vec![shop],
            ..MockSite::default()
        }
    }

    #[test]
    fn goto_matches_by_substring_and_falls_back_to_404() {
        let mut driver = MockDriver::new(site());
        let value = driver
            .apply(&DriverCommand::Goto {
                url: "https://shop.example.com/en/shop".to_string(),
                timeout_ms: 0,
                idle_timeout_ms: 0,
            })
            .unwrap()
            .unwrap();
        assert_eq!(value["httpStatus"], 200);

        let value = driver
            .apply(&DriverCommand::Goto {
                url: "https://shop.example.com/en/nowhere".to_string(),
                timeout_ms: 0,
                idle_timeout_ms: 0,
            })
            .unwrap()
            .unwrap();
        assert_eq!(value["httpStatus"], 404);
    }

    #[test]
    fn count_takes_first_matching_candidate() {
        let mut driver = MockDriver::new(site());
        driver
            .apply(&DriverCommand::Goto {
                url: "x/en/shop".to_string(),
                timeout_ms: 0,
                idle_timeout_ms: 0,
            })
            .unwrap();
        let value = driver
            .apply(&DriverCommand::Count {
                selectors: vec![
                    ".missing".to_string(),
                    r#"[class*="card"]"#.to_string(),
                ],
            })
            .unwrap()
            .unwrap();
        assert_eq!(value, serde_json::json!(12));
    }

    #[test]
    fn unknown_page_has_no_matches_or_text() {
        let mut driver = MockDriver::new(site());
        driver
            .apply(&DriverCommand::Goto {
                url: "x/en/nowhere".to_string(),
                timeout_ms: 0,
                idle_timeout_ms: 0,
            })
            .unwrap();
        let count = driver
            .apply(&DriverCommand::Count {
                selectors: vec![r#"[class*="card"]"#.to_string()],
            })
            .unwrap()
            .unwrap();
        assert_eq!(count, serde_json::json!(0));
        let text = driver
            .apply(&DriverCommand::Text {
                selector: "body".to_string(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(text, serde_json::json!(""));
    }

    #[test]
    fn screenshot_writes_placeholder_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("shot.png");
        let mut driver = MockDriver::new(site());
        driver
            .apply(&DriverCommand::Screenshot {
                path: path.to_string_lossy().into_owned(),
                full_page: true,
            })
            .unwrap();
        assert!(path.exists());
        // The placeholder must decode as a real PNG.
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn attribute_exposes_root_dir() {
        let mut site = site();
        site.pages[0].dir = Some("rtl".to_string());
        let mut driver = MockDriver::new(site);
        driver
            .apply(&DriverCommand::Goto {
                url: "x/en/shop".to_string(),
                timeout_ms: 0,
                idle_timeout_ms: 0,
            })
            .unwrap();
        let value = driver
            .apply(&DriverCommand::Attribute {
                selector: "html".to_string(),
                name: "dir".to_string(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(value, serde_json::json!("rtl"));
    }
}
