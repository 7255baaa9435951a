mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_routes, run_suite};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();

    match args.command {
        Commands::Run {
            base_url,
            screenshot_dir,
            viewport,
            nav_timeout,
            network_idle_timeout,
            command_timeout,
            no_preflight,
            format,
            output,
        } => {
            run_suite(
                &raw_args,
                args.config,
                args.verbose,
                base_url,
                screenshot_dir,
                viewport,
                nav_timeout,
                network_idle_timeout,
                command_timeout,
                no_preflight,
                format,
                output,
            )
            .await
        }
        Commands::Routes { format, output } => run_routes(args.config, format, output),
    }
}
