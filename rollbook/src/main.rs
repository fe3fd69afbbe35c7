//! Rollbook - interactive student record manager
//!
//! Menu-driven front end over a flat-file record store.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rollbook_engine::RecordStore;

mod config;
mod console;
mod menu;
mod render;

use config::Config;
use menu::{Menu, MenuOptions};

/// Rollbook - interactive student record manager
#[derive(Parser, Debug)]
#[command(name = "rollbook")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ./rollbook.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Record store file
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// CSV export destination
    #[arg(short, long)]
    export_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Don't wait for Enter after each action
    #[arg(long)]
    no_pause: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }
    if let Some(export_file) = args.export_file {
        config.export_file = export_file;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    if args.no_pause {
        config.pause = false;
    }

    // Logs go to stderr so they stay out of the menu
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let store = RecordStore::new(&config.data_file).with_temp_path(config.temp_path());

    info!("Starting rollbook v{}", env!("CARGO_PKG_VERSION"));
    info!("Data file: {}", store.path().display());
    info!("Export file: {}", config.export_file.display());

    let options = MenuOptions {
        export_path: config.export_file.clone(),
        pause: config.pause,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&store, options, stdin.lock(), stdout.lock()).run()?;

    info!("Rollbook stopped");
    Ok(())
}
