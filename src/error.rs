//! Error types for the Watch Later migration.
//!
//! Each variant maps to one stage of the run so the entry point can print a
//! targeted diagnostic.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while migrating or exporting a Watch Later playlist.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// A required environment variable is unset or empty
    #[error("{0} is not defined in your environment or .env file")]
    MissingEnv(&'static str),

    /// The CSV file could not be opened, read or written
    #[error("cannot access '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV record could not be parsed or written
    #[error("malformed CSV in '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The cookie was rejected or the session check failed
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// YouTube refused to create the playlist
    #[error("failed to create playlist: {0}")]
    PlaylistCreation(String),

    /// A Watch Later listing could not be fetched
    #[error("failed to fetch Watch Later: {0}")]
    Fetch(String),

    /// A batch removal from Watch Later was rejected
    #[error("failed to remove videos: {0}")]
    Removal(String),

    /// Transport-level failure talking to YouTube
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading from or writing to the terminal failed
    #[error("terminal I/O failed: {0}")]
    Terminal(#[source] std::io::Error),
}

impl MigrateError {
    /// Classify a `csv` error: I/O failures become `FileAccess`, the rest `Csv`.
    pub fn from_csv(err: csv::Error, path: &Path) -> Self {
        if err.is_io_error() {
            return MigrateError::FileAccess {
                path: path.to_path_buf(),
                source: std::io::Error::other(err),
            };
        }
        MigrateError::Csv {
            path: path.to_path_buf(),
            source: err,
        }
    }

    /// Whether this error means the CSV file does not exist.
    pub fn is_file_not_found(&self) -> bool {
        matches!(
            self,
            MigrateError::FileAccess { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

pub type Result<T, E = MigrateError> = std::result::Result<T, E>;
