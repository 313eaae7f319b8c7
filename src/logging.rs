//! Structured logging via `tracing`.
//!
//! The terminal belongs to the UI, so events go to a log file instead of
//! stderr.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;

use crate::error::Result;

/// Default log file under the platform data directory.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("upkeepy").join("upkeepy.log"))
}

/// Parse a level name, falling back to `INFO` on unknown input.
pub fn parse_level(name: &str) -> Level {
    name.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Install the global subscriber, appending to `path`.
pub fn init(path: &Path, level: Level) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
