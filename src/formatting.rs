use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pvr_lib::{ErrorOutput, PvrError, PvrOutput, RunRecord, PVR_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &PvrOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: PvrError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = PvrOutput::Error(ErrorOutput {
        version: PVR_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal/errors; failed checks use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(
    body: &PvrOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &PvrOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &PvrOutput, colorize: bool) -> String {
    match body {
        PvrOutput::Run(report) => {
            let mut buf = String::new();
            let passed = report.summary.all_passed();
            let status = if passed { "PASS" } else { "FAIL" };
            let status_colored = color(status, if passed { "32" } else { "31" }, colorize);
            writeln!(buf, "{} Storefront smoke test", status_colored).ok();
            writeln!(buf, "Target: {} ({})", report.base_url, report.viewport).ok();
            writeln!(
                buf,
                "Checks: {} passed, {} failed, {} total",
                report.summary.passed, report.summary.failed, report.summary.total
            )
            .ok();

            writeln!(buf, "Records:").ok();
            for record in &report.records {
                match record {
                    RunRecord::Page(page) => {
                        let marker = mark(page.success, colorize);
                        writeln!(
                            buf,
                            "- {} {} ({}, {:.2}s)",
                            marker, page.description, page.path, page.load_time
                        )
                        .ok();
                        for error in &page.errors {
                            writeln!(buf, "    error: {error}").ok();
                        }
                    }
                    RunRecord::Probe(probe) => {
                        let passed = probe.checks.iter().all(|c| c.passed);
                        writeln!(buf, "- {} {}", mark(passed, colorize), probe.description).ok();
                        for check in &probe.checks {
                            match &check.details {
                                Some(details) => writeln!(
                                    buf,
                                    "    {} {}: {}",
                                    mark(check.passed, colorize),
                                    check.name,
                                    details
                                )
                                .ok(),
                                None => writeln!(
                                    buf,
                                    "    {} {}",
                                    mark(check.passed, colorize),
                                    check.name
                                )
                                .ok(),
                            };
                        }
                    }
                }
            }

            writeln!(buf, "Screenshots: {}", report.screenshot_dir.display()).ok();
            buf
        }
        PvrOutput::Routes(out) => {
            let mut buf = String::new();
            let header = color("[ROUTES]", "36", colorize);
            writeln!(buf, "{} {} configured", header, out.routes.len()).ok();
            for route in &out.routes {
                let dark = if route.dark_mode { " [dark]" } else { "" };
                writeln!(buf, "- {:14} {}{} - {}", route.name, route.path, dark, route.description)
                    .ok();
            }
            buf
        }
        PvrOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn mark(passed: bool, colorize: bool) -> String {
    if passed {
        color("ok", "32", colorize)
    } else {
        color("FAIL", "31", colorize)
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Determine exit code for the run command.
pub fn exit_code_for_run(all_passed: bool) -> ExitCode {
    if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvr_lib::{
        default_routes, CheckOutcome, ErrorCategory, ErrorPayload, PageResult, ProbeResult, Route,
        RoutesOutput, RunReport, Viewport,
    };
    use std::path::PathBuf;

    // ExitCode has no PartialEq; compare via Debug. The real process exit
    // codes are asserted in tests/cli_exit_codes.rs.
    fn code_repr(code: ExitCode) -> String {
        format!("{code:?}")
    }

    #[test]
    fn exit_code_for_run_maps_pass_fail() {
        assert_eq!(code_repr(exit_code_for_run(true)), code_repr(ExitCode::SUCCESS));
        assert_eq!(code_repr(exit_code_for_run(false)), code_repr(ExitCode::from(1)));
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            PvrError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code_repr(code), code_repr(ExitCode::from(2)));
    }

    #[test]
    fn format_pretty_includes_status_records_and_summary() {
        let page = PageResult {
            name: "shop_ar".to_string(),
            description: "Shop Page (Arabic/RTL)".to_string(),
            path: "/ar/shop".to_string(),
            dark_mode: false,
            success: false,
            load_time: 2.41,
            errors: vec!["RTL not set correctly (dir=none)".to_string()],
            screenshot: Some(PathBuf::from("/tmp/shots/shop_ar.png")),
        };
        let mut probe = ProbeResult::new("shop_functionality", "Shop Page Functionality");
        probe
            .checks
            .push(CheckOutcome::with_details("Products Loaded", true, "Found 12 product cards"));
        probe.checks.push(CheckOutcome::new("Hero Section", false));

        let report = RunReport::new(
            "https://shop.example.com",
            Viewport::default(),
            PathBuf::from("/tmp/shots"),
            vec![RunRecord::Page(page), RunRecord::Probe(probe)],
        );

        let pretty = format_pretty(&PvrOutput::Run(report), false);
        assert!(pretty.contains("FAIL Storefront smoke test"));
        assert!(pretty.contains("Target: https://shop.example.com (1280x720)"));
        assert!(pretty.contains("Checks: 1 passed, 2 failed, 3 total"));
        assert!(pretty.contains("Shop Page (Arabic/RTL)"));
        assert!(pretty.contains("error: RTL not set correctly (dir=none)"));
        assert!(pretty.contains("Products Loaded: Found 12 product cards"));
        assert!(pretty.contains("Screenshots: /tmp/shots"));
    }

    #[test]
    fn format_pretty_lists_routes() {
        let out = PvrOutput::Routes(RoutesOutput {
            version: PVR_OUTPUT_VERSION.to_string(),
            routes: default_routes(),
        });
        let pretty = format_pretty(&out, false);
        assert!(pretty.contains("[ROUTES] 8 configured"));
        assert!(pretty.contains("/en/shop"));
        assert!(pretty.contains("[dark]"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = PvrOutput::Error(ErrorOutput {
            version: PVR_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload::new(
                ErrorCategory::Config,
                "bad input".to_string(),
                "check flags",
            ),
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }

    #[test]
    fn format_pretty_marks_dark_routes() {
        let route = Route::dark("/en/shop", "shop_en_dark", "Shop Page (English) - Dark Mode");
        let out = PvrOutput::Routes(RoutesOutput {
            version: PVR_OUTPUT_VERSION.to_string(),
            routes: vec![route],
        });
        let pretty = format_pretty(&out, false);
        assert!(pretty.contains("shop_en_dark"));
        assert!(pretty.contains("[dark]"));
    }
}
