use std::path::PathBuf;
use std::process::ExitCode;

use pvr_lib::{PvrOutput, RoutesOutput, PVR_OUTPUT_VERSION};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Print the effective route list.
pub fn run_routes(
    config_path: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };

    let body = PvrOutput::Routes(RoutesOutput {
        version: PVR_OUTPUT_VERSION.to_string(),
        routes: config.routes,
    });

    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(pvr_lib::PvrError::Config(err.to_string()), format, output);
    }

    ExitCode::SUCCESS
}
