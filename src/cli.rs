use clap::{Parser, Subcommand, ValueEnum};
use pvr_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pvr")]
#[command(
    version,
    about = "Page Verification Runner - Smoke-test a storefront with a headless browser",
    long_about = "Page Verification Runner (PVR)\n\nModes:\n- run: visit every configured route (availability, rendering, RTL, dark mode) and execute the shop/responsive/product-detail probes, capturing screenshots.\n- routes: print the effective route list.\n\nExit codes: 0 all checks passed, 1 at least one check failed, 2 fatal error.\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for base URL/routes/selectors/timeouts; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full verification suite against a storefront
    Run {
        #[arg(
            long,
            help = "Base URL of the storefront under test (e.g., https://shop.example.com)"
        )]
        base_url: Option<String>,

        #[arg(
            long,
            value_name = "PATH",
            help = "Directory for captured screenshots (created if missing)"
        )]
        screenshot_dir: Option<PathBuf>,

        #[arg(
            long,
            default_value = "1280x720",
            help = "Session viewport (WIDTHxHEIGHT), restored after the responsive probe"
        )]
        viewport: Viewport,

        #[arg(
            long,
            default_value = "30",
            help = "Navigation timeout (seconds) per page"
        )]
        nav_timeout: u64,

        #[arg(
            long,
            default_value = "10",
            help = "Network idle timeout (seconds) after navigation"
        )]
        network_idle_timeout: u64,

        #[arg(
            long,
            default_value = "45",
            help = "Per-command timeout (seconds) for the browser driver"
        )]
        command_timeout: u64,

        #[arg(long, help = "Skip the base-URL reachability preflight")]
        no_preflight: bool,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Print the effective route list
    Routes {
        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
