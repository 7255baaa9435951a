//! The page verification runner.
//!
//! A run is a fixed sequence against one browser session: every configured
//! route is visited and checked, then the three functional probes (shop
//! content, responsive layout, product detail) execute against the shop
//! page. Failures accumulate inside result records; a driver error aborts
//! only the remainder of the current route or probe, never the run. The
//! session is closed on every exit path.

use std::sync::Arc;
use std::time::Instant;

use url::Url;

use crate::browser::mock::mock_site_path;
use crate::browser::{BrowserSession, SessionOptions};
use crate::config::Config;
use crate::error::Result;
use crate::report::{
    CheckOutcome, PageResult, ProbeResult, RunRecord, RunReport, MIN_BODY_TEXT_CHARS,
};
use crate::route::Route;
use crate::viewport::RESPONSIVE_PRESETS;

/// Optional progress callback for human-readable step logging.
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// The shop route targeted by the functional probes.
const SHOP_PATH: &str = "/en/shop";

pub struct Runner {
    config: Config,
    progress: Option<ProgressCallback>,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn log(&self, message: &str) {
        if let Some(cb) = &self.progress {
            cb(message);
        }
    }

    /// Run the full suite: preflight, launch, execute, close, report.
    pub async fn run(&self) -> Result<RunReport> {
        self.config.require_base_url()?;
        self.config.validate()?;

        // Reachability preflight is meaningless against the mock driver.
        if self.config.preflight && mock_site_path().is_none() {
            self.preflight().await?;
        }

        std::fs::create_dir_all(&self.config.screenshot_dir)?;
        self.log(&format!(
            "Screenshots will be saved to: {}",
            self.config.screenshot_dir.display()
        ));

        let mut session = BrowserSession::launch(self.session_options()).await?;
        let records = self.execute(&mut session).await;
        if let Err(err) = session.close().await {
            self.log(&format!("Warning: failed to close browser session: {err}"));
        }

        Ok(RunReport::new(
            self.config.base_url.clone(),
            self.config.viewport,
            self.config.screenshot_dir.clone(),
            records,
        ))
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            viewport: self.config.viewport,
            navigation_timeout: self.config.timeouts.navigation,
            network_idle_timeout: self.config.timeouts.network_idle,
            command_timeout: self.config.timeouts.command,
            ..SessionOptions::default()
        }
    }

    /// Execute every route visit and probe against an existing session.
    pub async fn execute(&self, session: &mut BrowserSession) -> Vec<RunRecord> {
        let mut records = Vec::new();

        for route in &self.config.routes {
            records.push(RunRecord::Page(self.visit_page(session, route).await));
        }

        records.push(RunRecord::Probe(self.probe_shop(session).await));
        records.push(RunRecord::Probe(self.probe_responsive(session).await));
        records.push(RunRecord::Probe(self.probe_product_detail(session).await));

        records
    }

    async fn preflight(&self) -> Result<()> {
        let client = reqwest::Client::builder()
            .timeout(self.config.timeouts.preflight)
            .build()?;
        let response = client.get(self.config.base_url.as_str()).send().await?;
        // Any HTTP status passes; route checks judge statuses themselves.
        self.log(&format!(
            "Preflight: {} responded with {}",
            self.config.base_url,
            response.status()
        ));
        Ok(())
    }

    /// Visit one route. Always returns a fully-populated result; a driver
    /// error is recorded and short-circuits the remaining checks for this
    /// route only.
    async fn visit_page(&self, session: &mut BrowserSession, route: &Route) -> PageResult {
        let mut result = PageResult::from_route(route);
        self.log(&format!("Testing: {}", route.description));

        if let Err(err) = self.visit_steps(session, route, &mut result).await {
            result.errors.push(err.to_string());
        }

        result.success = result.errors.is_empty();
        self.log(&format!("  Load time: {:.2}s", result.load_time));
        self.log(if result.success {
            "  PASSED"
        } else {
            "  FAILED"
        });
        result
    }

    async fn visit_steps(
        &self,
        session: &mut BrowserSession,
        route: &Route,
        result: &mut PageResult,
    ) -> Result<()> {
        let url = self.absolute_url(&route.path)?;
        self.log(&format!("  URL: {url}"));
        if route.dark_mode {
            self.log("  Dark mode: yes");
        }

        let started = Instant::now();
        let status = session.goto(&url).await;
        result.load_time = round2(started.elapsed().as_secs_f64());
        let status = status?;

        if let Some(code) = status {
            self.log(&format!("  Status: {code}"));
            if code >= 400 {
                result.errors.push(format!("HTTP {code}"));
            }
        }

        session.settle(self.config.delays.page_settle).await?;

        if route.dark_mode {
            // A missing or unclickable toggle is not a failure.
            match session
                .click_first(&self.config.selectors.theme_toggle)
                .await
            {
                Ok(true) => {
                    session.settle(self.config.delays.toggle_settle).await?;
                    self.log("  Dark mode toggled");
                }
                Ok(false) => self.log("  No theme toggle found"),
                Err(err) => self.log(&format!("  Could not toggle dark mode: {err}")),
            }
        }

        let suffix = if route.dark_mode { "_dark" } else { "" };
        let screenshot = self
            .config
            .screenshot_dir
            .join(format!("{}{}.png", route.name, suffix));
        session.screenshot(&screenshot, true).await?;
        self.log(&format!("  Screenshot: {}", screenshot.display()));
        result.screenshot = Some(screenshot);

        let body = session.inner_text("body").await?;
        if body.chars().count() < MIN_BODY_TEXT_CHARS {
            result
                .errors
                .push("Page appears empty or has minimal content".to_string());
        }

        if route.is_arabic() {
            let dir = session.attribute("html", "dir").await?;
            if dir.as_deref() == Some("rtl") {
                self.log("  RTL layout confirmed");
            } else {
                result.errors.push(format!(
                    "RTL not set correctly (dir={})",
                    dir.as_deref().unwrap_or("none")
                ));
            }
        }

        Ok(())
    }

    async fn probe_shop(&self, session: &mut BrowserSession) -> ProbeResult {
        let mut probe = ProbeResult::new("shop_functionality", "Shop Page Functionality");
        self.log("Testing Shop Page Functionality");

        if let Err(err) = self.shop_checks(session, &mut probe.checks).await {
            probe
                .checks
                .push(CheckOutcome::failed("Shop Functionality", err.to_string()));
        }
        probe
    }

    async fn shop_checks(
        &self,
        session: &mut BrowserSession,
        checks: &mut Vec<CheckOutcome>,
    ) -> Result<()> {
        let url = self.absolute_url(SHOP_PATH)?;
        session.goto(&url).await?;
        session.settle(self.config.delays.probe_settle).await?;

        let selectors = &self.config.selectors;

        let cards = session.count(&selectors.product_card).await?;
        self.push_check(
            checks,
            CheckOutcome::with_details(
                "Products Loaded",
                cards > 0,
                format!("Found {cards} product cards"),
            ),
        );

        let found = session.count(&selectors.search_input).await? > 0;
        self.push_check(
            checks,
            CheckOutcome::with_details(
                "Search Input",
                found,
                if found {
                    "Search input found"
                } else {
                    "Search input not found"
                },
            ),
        );

        let buttons = session.count(&selectors.category_button).await?;
        self.push_check(
            checks,
            CheckOutcome::with_details(
                "Category Filters",
                buttons > 0,
                format!("Found {buttons} category buttons"),
            ),
        );

        let found = session.count(&selectors.hero).await? > 0;
        self.push_check(
            checks,
            CheckOutcome::with_details(
                "Hero Section",
                found,
                if found {
                    "Hero section found"
                } else {
                    "Hero section not found"
                },
            ),
        );

        let prices = session.count(&selectors.price).await?;
        self.push_check(
            checks,
            CheckOutcome::with_details(
                "Prices Displayed",
                prices > 0,
                format!("Found {prices} price elements"),
            ),
        );

        let badges = session.count(&selectors.stock_badge).await?;
        self.push_check(
            checks,
            CheckOutcome::with_details(
                "Stock Badges",
                badges > 0,
                format!("Found {badges} stock badges"),
            ),
        );

        Ok(())
    }

    async fn probe_responsive(&self, session: &mut BrowserSession) -> ProbeResult {
        let mut probe = ProbeResult::new("responsive_design", "Responsive Design");
        self.log("Testing Responsive Design");

        if let Err(err) = self.responsive_checks(session, &mut probe.checks).await {
            probe
                .checks
                .push(CheckOutcome::failed("Responsive Design", err.to_string()));
        }

        // Restore the session viewport even when a preset failed mid-loop.
        if let Err(err) = session.set_viewport(self.config.viewport).await {
            probe
                .checks
                .push(CheckOutcome::failed("Viewport Reset", err.to_string()));
        }

        probe
    }

    async fn responsive_checks(
        &self,
        session: &mut BrowserSession,
        checks: &mut Vec<CheckOutcome>,
    ) -> Result<()> {
        let url = self.absolute_url(SHOP_PATH)?;

        for preset in &RESPONSIVE_PRESETS {
            session.set_viewport(preset.viewport).await?;
            session.goto(&url).await?;
            session
                .settle(self.config.delays.responsive_settle)
                .await?;

            let screenshot = self
                .config
                .screenshot_dir
                .join(format!("responsive_{}.png", preset.name));
            session.screenshot(&screenshot, false).await?;

            let visible = session.is_visible("body").await?;
            self.push_check(
                checks,
                CheckOutcome::with_details(
                    format!(
                        "{} ({}x{})",
                        preset.device, preset.viewport.width, preset.viewport.height
                    ),
                    visible,
                    screenshot.display().to_string(),
                ),
            );
        }

        Ok(())
    }

    async fn probe_product_detail(&self, session: &mut BrowserSession) -> ProbeResult {
        let mut probe = ProbeResult::new("product_detail", "Product Detail Page");
        self.log("Testing Product Detail Page");

        if let Err(err) = self.detail_checks(session, &mut probe.checks).await {
            probe
                .checks
                .push(CheckOutcome::failed("Product Detail", err.to_string()));
        }
        probe
    }

    async fn detail_checks(
        &self,
        session: &mut BrowserSession,
        checks: &mut Vec<CheckOutcome>,
    ) -> Result<()> {
        let url = self.absolute_url(SHOP_PATH)?;
        session.goto(&url).await?;
        session.settle(self.config.delays.probe_settle).await?;

        let mut links = Vec::new();
        for candidate in &self.config.selectors.product_link {
            links = session.hrefs(candidate).await?;
            if !links.is_empty() {
                break;
            }
        }

        let Some(href) = links.first() else {
            self.push_check(
                checks,
                CheckOutcome::failed("Product Links", "No product links found"),
            );
            return Ok(());
        };

        let target = self.absolute_url(href)?;
        self.log(&format!("  Navigating to product: {href}"));
        session.goto(&target).await?;
        session.settle(self.config.delays.page_settle).await?;

        let screenshot = self.config.screenshot_dir.join("product_detail.png");
        session.screenshot(&screenshot, true).await?;

        let selectors = &self.config.selectors;
        let detail_checks = [
            ("Product Image", &selectors.detail_image),
            ("Product Name", &selectors.detail_name),
            ("Price", &selectors.detail_price),
            ("Add to Cart", &selectors.add_to_cart),
        ];
        for (name, candidates) in detail_checks {
            let passed = session.count(candidates).await? > 0;
            self.push_check(checks, CheckOutcome::new(name, passed));
        }

        Ok(())
    }

    fn push_check(&self, checks: &mut Vec<CheckOutcome>, check: CheckOutcome) {
        let marker = if check.passed { "ok" } else { "FAIL" };
        match &check.details {
            Some(details) => self.log(&format!("  [{marker}] {}: {details}", check.name)),
            None => self.log(&format!("  [{marker}] {}", check.name)),
        }
        checks.push(check);
    }

    /// Resolve a route path or product href against the base URL; absolute
    /// hrefs pass through unchanged.
    fn absolute_url(&self, reference: &str) -> Result<String> {
        let base = Url::parse(&self.config.base_url)?;
        Ok(base.join(reference)?.to_string())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
