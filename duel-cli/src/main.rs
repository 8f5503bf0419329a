use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::ops::ControlFlow;
use std::path::PathBuf;

mod render;

use duel::client::unix_now;
use duel::error::logging;
use duel::{Address, DuelConfig, GameWatcher, RetryingReader, SnapshotFileReader};

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Reconstruct the phase of a commit-reveal wagering contract")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive phase and available actions from a snapshot file
    Inspect {
        /// Snapshot JSON file, or a directory of `<contract>.json` files
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Game contract address
        #[arg(long)]
        contract: Address,

        /// Connected account; omit to view as a spectator
        #[arg(short, long)]
        viewer: Option<Address>,

        /// Unix time to derive at (defaults to now)
        #[arg(long)]
        now: Option<u64>,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-derive the view every poll interval until the game settles
    Watch {
        /// Snapshot JSON file, or a directory of `<contract>.json` files
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Game contract address
        #[arg(long)]
        contract: Address,

        /// Connected account; omit to view as a spectator
        #[arg(short, long)]
        viewer: Option<Address>,
    },
    /// Write a default configuration file
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Use the production preset
        #[arg(long)]
        production: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DuelConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DuelConfig::default(),
    };

    let logging_config = config.logging.to_logging_config()?;
    logging::init_logging(logging_config)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    match cli.command {
        Command::Inspect { snapshot, contract, viewer, now, json } => {
            let reader = RetryingReader::from_config(SnapshotFileReader::new(&snapshot), &config.network);
            let watcher = GameWatcher::with_config(reader, contract, &config.game);

            let view = watcher
                .pull(viewer, now.unwrap_or_else(unix_now))
                .await
                .with_context(|| format!("deriving view from {}", snapshot.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::render_view(&view, contract));
            }
        }
        Command::Watch { snapshot, contract, viewer } => {
            let reader = RetryingReader::from_config(SnapshotFileReader::new(&snapshot), &config.network);
            let watcher = GameWatcher::with_config(reader, contract, &config.game);

            watcher
                .watch(viewer, config.network.poll_interval(), |result| match result {
                    Ok(view) => {
                        println!("{}", render::render_view(&view, contract));
                        if view.phase.is_settled() {
                            ControlFlow::Break(())
                        } else {
                            ControlFlow::Continue(())
                        }
                    }
                    Err(e) => {
                        eprintln!("{} {}", "error:".red().bold(), e);
                        ControlFlow::Continue(())
                    }
                })
                .await;
        }
        Command::InitConfig { path, production } => {
            let preset = if production { DuelConfig::production() } else { DuelConfig::default() };
            preset.to_file(&path)?;
            tracing::info!(path = %path.display(), "Wrote configuration");
        }
    }

    Ok(())
}
