//! Playwright integration for the long-lived browser driver.
//!
//! This module contains the inline driver script, error mapping, and
//! availability checks for Node.js and Playwright. The script hosts one
//! browser, context, and page for the whole run and executes the wire
//! protocol from stdin, one JSON command per line.

use crate::error::{PvrError, Result};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Long-lived Playwright driver executing protocol commands over stdio.
pub(crate) const DRIVER_SCRIPT: &str = r#"
const [, width, height, headlessFlag, locale] = process.argv;
const readline = require('readline');

function reply(payload) {
  process.stdout.write(JSON.stringify(payload) + '\n');
}

async function execute(page, cmd) {
  switch (cmd.op) {
    case 'goto': {
      const response = await page.goto(cmd.url, { waitUntil: 'networkidle', timeout: cmd.timeoutMs });
      await page.waitForLoadState('networkidle', { timeout: cmd.idleTimeoutMs });
      return { httpStatus: response ? response.status() : null };
    }
    case 'wait':
      await page.waitForTimeout(cmd.ms);
      return null;
    case 'count': {
      for (const selector of cmd.selectors) {
        const n = await page.locator(selector).count();
        if (n > 0) return n;
      }
      return 0;
    }
    case 'clickFirst': {
      for (const selector of cmd.selectors) {
        const locator = page.locator(selector);
        if (await locator.count() > 0) {
          await locator.first().click();
          return true;
        }
      }
      return false;
    }
    case 'text':
      return await page.locator(cmd.selector).first().innerText();
    case 'attribute':
      return await page.locator(cmd.selector).first().getAttribute(cmd.name);
    case 'screenshot':
      await page.screenshot({ path: cmd.path, fullPage: !!cmd.fullPage });
      return null;
    case 'setViewport':
      await page.setViewportSize({ width: cmd.width, height: cmd.height });
      return null;
    case 'isVisible':
      return await page.locator(cmd.selector).first().isVisible();
    case 'hrefs': {
      const out = [];
      for (const el of await page.locator(cmd.selector).all()) {
        const href = await el.getAttribute('href');
        if (href) out.push(href);
      }
      return out;
    }
    default:
      throw new Error('unknown op: ' + cmd.op);
  }
}

async function run() {
  let browser;
  try {
    const { chromium } = require('playwright');
    browser = await chromium.launch({ headless: headlessFlag !== '0' });
    const context = await browser.newContext({
      viewport: {
        width: parseInt(width, 10),
        height: parseInt(height, 10)
      },
      locale: locale || 'en-US'
    });
    const page = await context.newPage();

    const rl = readline.createInterface({ input: process.stdin, terminal: false });
    for await (const line of rl) {
      if (!line.trim()) continue;
      let cmd;
      try {
        cmd = JSON.parse(line);
      } catch (err) {
        reply({ status: 'error', message: 'bad command: ' + err.message });
        continue;
      }
      if (cmd.op === 'close') {
        reply({ status: 'ok' });
        break;
      }
      try {
        reply({ status: 'ok', value: await execute(page, cmd) });
      } catch (err) {
        reply({ status: 'error', message: err && err.message ? err.message : String(err) });
      }
    }
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    process.stderr.write(JSON.stringify({ status: 'error', message }) + '\n');
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close();
    }
  }
}

run();
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Script to check if Playwright is installed.
const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

/// Error payload the driver writes to stderr on startup failure.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    #[allow(dead_code)]
    pub status: String,
    pub message: String,
}

/// Maps a spawn error to an appropriate PvrError.
pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> PvrError {
    if err.kind() == io::ErrorKind::NotFound {
        PvrError::Browser(format!(
            "Unable to spawn the browser driver; '{}' was not found on PATH",
            command
        ))
    } else {
        PvrError::Io(err)
    }
}

/// Maps driver stderr output to an appropriate PvrError.
pub(crate) fn map_driver_stderr(stderr: &str) -> PvrError {
    if let Ok(error) = serde_json::from_str::<ScriptError>(stderr) {
        return map_driver_message(&error.message);
    }

    if stderr
        .to_ascii_lowercase()
        .contains("cannot find module 'playwright'")
    {
        return PvrError::Browser(
            "Cannot find module 'playwright'; install with `npm install playwright`.".to_string(),
        );
    }

    PvrError::Browser(format!("driver exited: {}", stderr.trim()))
}

/// Maps an in-band driver error message to a PvrError.
pub(crate) fn map_driver_message(message: &str) -> PvrError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("cannot find module 'playwright'") {
        PvrError::Browser(
            "Cannot find module 'playwright'; install with `npm install playwright`.".to_string(),
        )
    } else {
        PvrError::Browser(message.to_string())
    }
}

/// Ensures Node.js is available on the system.
pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            PvrError::Browser(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(PvrError::Browser(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

/// Ensures the Playwright npm package is installed.
pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            PvrError::Browser(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_driver_stderr(&stderr));
    }

    Ok(())
}
