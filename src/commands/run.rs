use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use pvr_lib::{ProgressCallback, PvrOutput, Runner, Viewport};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_run, render_error, write_output};
use crate::settings::{load_config, log_effective_config, resolve_run_config, RunFlagSources};

/// Run the verification suite.
#[allow(clippy::too_many_arguments)]
pub async fn run_suite(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    base_url: Option<String>,
    screenshot_dir: Option<PathBuf>,
    viewport: Viewport,
    nav_timeout: u64,
    network_idle_timeout: u64,
    command_timeout: u64,
    no_preflight: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let flag_sources = RunFlagSources::from_args(raw_args);
    let config = resolve_run_config(
        config,
        base_url,
        screenshot_dir,
        viewport,
        nav_timeout,
        network_idle_timeout,
        command_timeout,
        no_preflight,
        &flag_sources,
    );

    if let Err(err) = config.require_base_url() {
        return render_error(err, format, output.clone());
    }

    if verbose {
        log_effective_config(config_path.as_deref(), &config);
    }

    // Progress goes to stderr; stdout carries the report.
    let progress: ProgressCallback = Arc::new(|msg: &str| eprintln!("{msg}"));
    let runner = Runner::new(config).with_progress(progress);

    let report = match runner.run().await {
        Ok(report) => report,
        Err(err) => return render_error(err, format, output),
    };

    let all_passed = report.summary.all_passed();
    eprintln!(
        "Passed: {}  Failed: {}  Total: {}",
        report.summary.passed, report.summary.failed, report.summary.total
    );

    let body = PvrOutput::Run(report);
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(pvr_lib::PvrError::Config(err.to_string()), format, output);
    }

    exit_code_for_run(all_passed)
}
