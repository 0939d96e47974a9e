mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod services;
mod ui;
mod viewer;

use crate::cli::{Cli, Commands};
use crate::commands::Context;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::services::Cancellation;
use crate::ui::{CliProgressHandler, UiManager};
use clap::Parser;
use tokio::task;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🚀 Isoscope v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!("Setting Rayon global thread pool to {} threads.", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let config = AppConfig::load(&cli)?;
    let cli_quiet = cli.quiet;

    let (ui_manager, ui_sender, shutdown_sender) = UiManager::new();
    let ui_handle = task::spawn(ui_manager.run());
    let (cancel_sender, cancellation) = Cancellation::channel();
    let ctx = Context {
        config,
        progress: CliProgressHandler::new(ui_sender),
        cancellation,
    };

    let command = async {
        match cli.command {
            Commands::Search(args) => {
                info!("Dispatching to 'search' command.");
                commands::search::run(args, &ctx).await
            }
            Commands::Gene(args) => {
                info!("Dispatching to 'gene' command.");
                commands::gene::run(args, &ctx).await
            }
            Commands::Protein(args) => {
                info!("Dispatching to 'protein' command.");
                commands::protein::run(args, &ctx).await
            }
            Commands::Predict(args) => {
                info!("Dispatching to 'predict' command.");
                commands::predict::run(args, &ctx).await
            }
            Commands::Confidence(args) => {
                info!("Dispatching to 'confidence' command.");
                task::spawn_blocking(move || commands::confidence::run(args))
                    .await
                    .map_err(|e| CliError::Other(anyhow::anyhow!("Worker task failed: {}", e)))?
            }
            Commands::Catalog => commands::catalog::run(),
        }
    };

    // Ctrl-C flips the cancellation signal; dropping the command future aborts its requests.
    let command_result = tokio::select! {
        result = command => result,
        _ = tokio::signal::ctrl_c() => {
            let _ = cancel_sender.send(true);
            warn!("Interrupted, cancelling outstanding requests.");
            Err(CliError::Cancelled)
        }
    };

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            if !cli_quiet {
                ctx.progress.log("✅ Command completed successfully.");
            }
        }
        Err(e) => error!("❌ Command failed: {}", e),
    }

    if shutdown_sender.send(true).is_err() {
        warn!("UI manager may have already exited before shutdown signal.");
    }
    drop(ctx);

    ui_handle
        .await
        .map_err(|e| CliError::Other(anyhow::anyhow!("UI manager task failed: {}", e)))?;

    command_result
}
