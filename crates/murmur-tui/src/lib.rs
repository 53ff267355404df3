//! Terminal UI for Murmur
//!
//! A thin shell over [`murmur_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`murmur_app::Runtime`].
//!
//! This crate only handles key input, slash commands and terminal rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod env;
pub mod input;
pub mod terminal;
pub mod ui;

use std::path::PathBuf;

pub use env::SeededEnv;
pub use input::{InputState, KeyInput};
pub use murmur_app::{App, AppAction, AppEvent, Driver, Runtime};
use murmur_app::AppConfig;
use murmur_core::{Environment, KeyValueStore};
pub use terminal::{TerminalDriver, TerminalError};

/// Directory used when neither `--data-dir` nor a platform data dir exists.
pub const FALLBACK_DATA_DIR: &str = ".murmur";

/// Default data directory: the platform data dir plus `murmur/`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(FALLBACK_DATA_DIR), |dir| dir.join("murmur"))
}

/// Run the terminal front end until the user quits.
///
/// Validates `config`, restores state from `store` and drives the app with
/// a [`TerminalDriver`].
pub async fn run<E, S>(env: E, store: S, config: AppConfig) -> Result<(), TerminalError>
where
    E: Environment,
    S: KeyValueStore,
{
    let app = App::new(env, config)?;
    let driver = TerminalDriver::new()?;

    tracing::info!("starting terminal UI");
    let app = Runtime::new(driver, app, store).run().await?;
    tracing::info!(
        "terminal UI exited with {} conversations",
        app.conversations().values().filter(|m| !m.is_empty()).count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_dir_ends_in_murmur() {
        let dir = default_data_dir();
        assert!(dir.ends_with("murmur") || dir.ends_with(FALLBACK_DATA_DIR));
    }
}
