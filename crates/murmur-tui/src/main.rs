//! Murmur terminal entry point.
//!
//! # Usage
//!
//! ```bash
//! # Persist under the platform data directory
//! murmur
//!
//! # Throwaway session with reproducible typing simulation
//! murmur --in-memory --seed 7 --log-level debug
//! ```

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use murmur_app::AppConfig;
use murmur_core::{
    Environment, SystemEnv,
    storage::{FileStore, MemoryStore},
};
use murmur_tui::{SeededEnv, TerminalError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Murmur terminal messaging client
#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(about = "Terminal messaging mock-up with simulated delivery and typing")]
#[command(version)]
struct Args {
    /// Directory for persisted state
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log file (defaults to murmur.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Keep state in memory only
    #[arg(long)]
    in_memory: bool,

    /// Seed the RNG for reproducible typing simulation
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let data_dir = args.data_dir.clone().unwrap_or_else(murmur_tui::default_data_dir);
    fs::create_dir_all(&data_dir)?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_path = args.log_file.clone().unwrap_or_else(|| data_dir.join("murmur.log"));
    let log_file = OpenOptions::new().create(true).append(true).open(&log_path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!("Murmur starting");
    tracing::info!("data directory {}", data_dir.display());

    match args.seed {
        Some(seed) => {
            tracing::info!("seeded randomness: {seed}");
            launch(SeededEnv::new(seed), &args, &data_dir).await?;
        },
        None => launch(SystemEnv::new(), &args, &data_dir).await?,
    }

    Ok(())
}

async fn launch<E: Environment>(
    env: E,
    args: &Args,
    data_dir: &Path,
) -> Result<(), TerminalError> {
    let config = AppConfig::default();
    if args.in_memory {
        tracing::info!("in-memory mode, nothing will be persisted");
        murmur_tui::run(env, MemoryStore::new(), config).await
    } else {
        murmur_tui::run(env, FileStore::open(data_dir)?, config).await
    }
}
