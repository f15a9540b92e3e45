//! Error types for the coach-focus application.
//!
//! The focus-tracking core never fails: missing geometry is skipped and
//! retried on the next trigger. Errors only arise at the edges of the
//! application, where configuration, transcripts, logging and the terminal
//! are touched.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error wrapping all edge failures
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - [`TranscriptError`] - Seed transcript read/parse failures
//!   - `std::io::Error` - Terminal/TUI rendering failures

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// Domain-specific errors convert via `From`, so `?` composes cleanly
/// from `main` down to the individual loaders.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Seed transcript could not be loaded.
    ///
    /// Fatal at startup: the user explicitly asked for this transcript.
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when loading a seed transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// The transcript file could not be read.
    #[error("Failed to read transcript at {path:?}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The transcript is not a JSON array of messages.
    #[error("Invalid transcript JSON in {path:?}: {source}")]
    Parse {
        /// Path with invalid content.
        path: PathBuf,
        /// Parse error details.
        #[source]
        source: serde_json::Error,
    },

    /// Two messages share the same id.
    #[error("Duplicate message id {id:?} in {path:?}")]
    DuplicateId {
        /// Path of the transcript.
        path: PathBuf,
        /// The repeated id.
        id: String,
    },
}
