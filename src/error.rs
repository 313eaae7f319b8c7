use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors outside catalog loading (terminal, log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The catalog context file is missing or malformed.
    #[error("Context file {}: {reason}", path.display())]
    Context { path: PathBuf, reason: String },

    /// A bin directory could not be listed while building the catalog.
    #[error("Cannot read catalog directory {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Wrap an I/O error raised while listing `path`.
    pub fn catalog(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Catalog {
            path: path.into(),
            source,
        }
    }
}
