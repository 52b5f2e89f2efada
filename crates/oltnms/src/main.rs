mod cli;
mod commands;
mod config;
mod error;
mod notify;
mod output;

use std::io::IsTerminal;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use oltnms_api::FileStorage;
use oltnms_core::Nms;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::notify::TerminalNotifier;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "oltnms", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the backend under the profile's session
        cmd => {
            let cfg = config::load_config()?;
            let (profile_name, profile) = config::active_profile(&cli.global, &cfg)?;
            let nms_config = config::resolve_profile(&profile, &cfg, &cli.global)?;

            let storage = FileStorage::open(config::session_path(&profile_name)).map_err(|e| CliError::Storage {
                message: e.to_string(),
            })?;
            let color = output::should_color(cli.global.color, &std::io::stderr());
            let notifier = Arc::new(TerminalNotifier::new(color, cli.global.quiet));
            let nms = Nms::new(nms_config, Arc::new(storage), notifier)?;

            let ctx = commands::Ctx {
                nms: &nms,
                global: &cli.global,
                profile_name: &profile_name,
                profile: &profile,
                interactive: std::io::stdin().is_terminal(),
            };

            tracing::debug!(command = ?cmd, profile = %profile_name, "dispatching command");
            commands::dispatch(cmd, &ctx)
                .await
                .map_err(|e| e.for_profile(&profile_name))
        }
    }
}
