use std::path::{Path, PathBuf};
use std::time::Duration;

use pvr_lib::{Config, PvrError, Viewport};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct RunFlagSources {
    pub viewport: bool,
    pub nav_timeout: bool,
    pub network_idle_timeout: bool,
    pub command_timeout: bool,
}

impl RunFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            viewport: flag_present(args, "--viewport"),
            nav_timeout: flag_present(args, "--nav-timeout"),
            network_idle_timeout: flag_present(args, "--network-idle-timeout"),
            command_timeout: flag_present(args, "--command-timeout"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Merge CLI arguments over the config file, preferring CLI when flags are
/// present, and produce the effective run configuration.
#[allow(clippy::too_many_arguments)]
pub fn resolve_run_config(
    mut config: Config,
    cli_base_url: Option<String>,
    cli_screenshot_dir: Option<PathBuf>,
    cli_viewport: Viewport,
    cli_nav_timeout: u64,
    cli_network_idle_timeout: u64,
    cli_command_timeout: u64,
    cli_no_preflight: bool,
    flags: &RunFlagSources,
) -> Config {
    if let Some(base_url) = cli_base_url {
        config.base_url = base_url;
    }
    if let Some(dir) = cli_screenshot_dir {
        config.screenshot_dir = dir;
    }
    if flags.viewport {
        config.viewport = cli_viewport;
    }
    if flags.nav_timeout {
        config.timeouts.navigation = Duration::from_secs(cli_nav_timeout);
    }
    if flags.network_idle_timeout {
        config.timeouts.network_idle = Duration::from_secs(cli_network_idle_timeout);
    }
    if flags.command_timeout {
        config.timeouts.command = Duration::from_secs(cli_command_timeout);
    }
    if cli_no_preflight {
        config.preflight = false;
    }
    config
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/pvr/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, PvrError> {
    let cfg = Config::load(path)?;
    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        PvrError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Log effective config to stderr (verbose mode).
pub fn log_effective_config(config_path: Option<&Path>, config: &Config) {
    let config_source = config_path
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "defaults/built-in".to_string());
    eprintln!(
        "Effective config (source: {}): base URL {}, viewport {}, screenshots {}, timeouts nav {}s / idle {}s / command {}s, preflight {}, {} routes",
        config_source,
        if config.base_url.is_empty() {
            "<unset>"
        } else {
            config.base_url.as_str()
        },
        config.viewport,
        config.screenshot_dir.display(),
        config.timeouts.navigation.as_secs(),
        config.timeouts.network_idle.as_secs(),
        config.timeouts.command.as_secs(),
        config.preflight,
        config.routes.len()
    );
}
