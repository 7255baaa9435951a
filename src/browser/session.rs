//! Browser session management.
//!
//! One [`BrowserSession`] owns the driver process (browser, context, and
//! page) for the lifetime of a run: acquired once at the start, released
//! once at the end via [`BrowserSession::close`], regardless of how many
//! checks failed in between. Commands are strictly sequential; each is
//! guarded by a wall-clock timeout, and a timed-out driver is killed rather
//! than left running.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

use super::mock::{mock_site_path, MockDriver, MockSite};
use super::playwright::{
    ensure_node_available, ensure_playwright_available, map_driver_message, map_driver_stderr,
    map_spawn_error, DRIVER_SCRIPT,
};
use super::protocol::{DriverCommand, DriverReply, GotoValue};
use crate::error::{PvrError, Result};
use crate::viewport::Viewport;

/// Default timeout for page navigation.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for waiting for network idle state.
pub const DEFAULT_NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default wall-clock guard on a single driver command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(45);

/// Grace period for the driver to exit after a close command.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration options for a browser session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// The Node.js command to use (default: "node").
    pub node_command: String,
    /// Initial viewport for the browser context.
    pub viewport: Viewport,
    pub headless: bool,
    /// Context locale (the storefront defaults to English).
    pub locale: String,
    pub navigation_timeout: Duration,
    pub network_idle_timeout: Duration,
    pub command_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            viewport: Viewport::default(),
            headless: true,
            locale: "en-US".to_string(),
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

#[derive(Debug)]
struct DriverProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

#[derive(Debug)]
enum Transport {
    Driver(DriverProcess),
    Mock(MockDriver),
}

/// A live browser session speaking the driver wire protocol.
#[derive(Debug)]
pub struct BrowserSession {
    transport: Transport,
    options: SessionOptions,
    viewport: Viewport,
}

impl BrowserSession {
    /// Launch the Playwright driver, or a mock session when the
    /// `PVR_MOCK_SITE` fixture is configured.
    pub async fn launch(options: SessionOptions) -> Result<Self> {
        if let Some(path) = mock_site_path() {
            let site = MockSite::load(&path)?;
            return Ok(Self::with_mock_site(site, options));
        }

        ensure_node_available(&options.node_command).await?;
        ensure_playwright_available(&options.node_command).await?;

        let mut cmd = Command::new(&options.node_command);
        cmd.arg("-e")
            .arg(DRIVER_SCRIPT)
            .arg(options.viewport.width.to_string())
            .arg(options.viewport.height.to_string())
            .arg(if options.headless { "1" } else { "0" })
            .arg(&options.locale)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|err| map_spawn_error(err, &options.node_command))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PvrError::Browser("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| PvrError::Browser("driver stdout unavailable".to_string()))?;

        let viewport = options.viewport;
        Ok(Self {
            transport: Transport::Driver(DriverProcess {
                child,
                stdin,
                stdout,
            }),
            options,
            viewport,
        })
    }

    /// Build a session answering from a virtual storefront (tests/CI).
    pub fn with_mock_site(site: MockSite, options: SessionOptions) -> Self {
        let viewport = options.viewport;
        Self {
            transport: Transport::Mock(MockDriver::new(site)),
            options,
            viewport,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.transport, Transport::Mock(_))
    }

    /// The viewport last requested from the driver.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Navigate and wait for network idle; returns the HTTP status if the
    /// navigation produced a response.
    pub async fn goto(&mut self, url: &str) -> Result<Option<u16>> {
        let command = DriverCommand::Goto {
            url: url.to_string(),
            timeout_ms: self.options.navigation_timeout.as_millis() as u64,
            idle_timeout_ms: self.options.network_idle_timeout.as_millis() as u64,
        };
        let value = self.command(&command).await?;
        let goto: GotoValue = serde_json::from_value(value)
            .map_err(|e| PvrError::Browser(format!("unexpected goto reply: {e}")))?;
        Ok(goto.http_status)
    }

    /// Fixed settle delay, executed inside the driver.
    pub async fn settle(&mut self, delay: Duration) -> Result<()> {
        if delay.is_zero() {
            return Ok(());
        }
        self.command(&DriverCommand::Wait {
            ms: delay.as_millis() as u64,
        })
        .await?;
        Ok(())
    }

    /// Match count for the first selector candidate with any match.
    pub async fn count(&mut self, selectors: &[String]) -> Result<u64> {
        let value = self
            .command(&DriverCommand::Count {
                selectors: selectors.to_vec(),
            })
            .await?;
        serde_json::from_value(value)
            .map_err(|e| PvrError::Browser(format!("unexpected count reply: {e}")))
    }

    /// Click the first element of the first matching candidate; false when
    /// nothing matched.
    pub async fn click_first(&mut self, selectors: &[String]) -> Result<bool> {
        let value = self
            .command(&DriverCommand::ClickFirst {
                selectors: selectors.to_vec(),
            })
            .await?;
        serde_json::from_value(value)
            .map_err(|e| PvrError::Browser(format!("unexpected click reply: {e}")))
    }

    pub async fn inner_text(&mut self, selector: &str) -> Result<String> {
        let value = self
            .command(&DriverCommand::Text {
                selector: selector.to_string(),
            })
            .await?;
        serde_json::from_value(value)
            .map_err(|e| PvrError::Browser(format!("unexpected text reply: {e}")))
    }

    pub async fn attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>> {
        let value = self
            .command(&DriverCommand::Attribute {
                selector: selector.to_string(),
                name: name.to_string(),
            })
            .await?;
        serde_json::from_value(value)
            .map_err(|e| PvrError::Browser(format!("unexpected attribute reply: {e}")))
    }

    pub async fn screenshot(&mut self, path: &Path, full_page: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.command(&DriverCommand::Screenshot {
            path: path.to_string_lossy().into_owned(),
            full_page,
        })
        .await?;
        Ok(())
    }

    pub async fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.command(&DriverCommand::SetViewport {
            width: viewport.width,
            height: viewport.height,
        })
        .await?;
        self.viewport = viewport;
        Ok(())
    }

    pub async fn is_visible(&mut self, selector: &str) -> Result<bool> {
        let value = self
            .command(&DriverCommand::IsVisible {
                selector: selector.to_string(),
            })
            .await?;
        serde_json::from_value(value)
            .map_err(|e| PvrError::Browser(format!("unexpected visibility reply: {e}")))
    }

    pub async fn hrefs(&mut self, selector: &str) -> Result<Vec<String>> {
        let value = self
            .command(&DriverCommand::Hrefs {
                selector: selector.to_string(),
            })
            .await?;
        serde_json::from_value(value)
            .map_err(|e| PvrError::Browser(format!("unexpected hrefs reply: {e}")))
    }

    /// Shut the driver down. Close on all exit paths: a driver that ignores
    /// the close command is killed after a grace period.
    pub async fn close(self) -> Result<()> {
        match self.transport {
            Transport::Mock(_) => Ok(()),
            Transport::Driver(mut driver) => {
                if let Ok(mut line) = serde_json::to_string(&DriverCommand::Close) {
                    line.push('\n');
                    let _ = driver.stdin.write_all(line.as_bytes()).await;
                    let _ = driver.stdin.flush().await;
                }
                match timeout(CLOSE_TIMEOUT, driver.child.wait()).await {
                    Ok(Ok(_status)) => Ok(()),
                    _ => {
                        let _ = driver.child.kill().await;
                        let _ = driver.child.wait().await;
                        Ok(())
                    }
                }
            }
        }
    }

    async fn command(&mut self, command: &DriverCommand) -> Result<Value> {
        match &mut self.transport {
            Transport::Mock(mock) => Ok(mock.apply(command)?.unwrap_or(Value::Null)),
            Transport::Driver(driver) => {
                let mut line = serde_json::to_string(command)?;
                line.push('\n');
                driver.stdin.write_all(line.as_bytes()).await.map_err(|e| {
                    PvrError::Browser(format!("failed to send command to driver: {e}"))
                })?;
                driver.stdin.flush().await.map_err(|e| {
                    PvrError::Browser(format!("failed to send command to driver: {e}"))
                })?;

                let mut reply_line = String::new();
                let read = timeout(
                    self.options.command_timeout,
                    driver.stdout.read_line(&mut reply_line),
                )
                .await;

                match read {
                    Err(_) => {
                        let _ = driver.child.start_kill();
                        Err(PvrError::Browser(format!(
                            "driver timed out after {:?}",
                            self.options.command_timeout
                        )))
                    }
                    Ok(Err(err)) => Err(PvrError::Browser(format!(
                        "failed to read driver reply: {err}"
                    ))),
                    Ok(Ok(0)) => Err(driver_exit_error(driver).await),
                    Ok(Ok(_)) => {
                        let reply: DriverReply =
                            serde_json::from_str(&reply_line).map_err(|_| {
                                PvrError::Browser(format!(
                                    "unexpected driver output: {}",
                                    reply_line.trim()
                                ))
                            })?;
                        if reply.is_ok() {
                            Ok(reply.value.unwrap_or(Value::Null))
                        } else {
                            Err(map_driver_message(
                                reply.message.as_deref().unwrap_or("no additional details"),
                            ))
                        }
                    }
                }
            }
        }
    }
}

/// The driver closed its stdout; surface whatever it left on stderr.
async fn driver_exit_error(driver: &mut DriverProcess) -> PvrError {
    let mut stderr_buf = String::new();
    if let Some(stderr) = driver.child.stderr.as_mut() {
        let _ = timeout(Duration::from_secs(2), stderr.read_to_string(&mut stderr_buf)).await;
    }
    let _ = driver.child.start_kill();
    if stderr_buf.trim().is_empty() {
        PvrError::Browser("driver exited unexpectedly".to_string())
    } else {
        map_driver_stderr(&stderr_buf)
    }
}
