//! Garden errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving the content root, reading notes, or loading config.
///
/// Query operations never surface these to callers; they degrade to fewer
/// results instead. Only construction and explicit reads return them.
#[derive(Debug, Error)]
pub enum GardenError {
    /// The content root is missing or not a directory.
    #[error("content root is not accessible: {path}: {reason}")]
    ContentRoot {
        /// Root that was requested.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },
    /// A note file could not be read.
    #[error("failed to read note '{slug}': {source}")]
    Io {
        /// Slug of the note being read.
        slug: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The slug is empty or escapes the content root.
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
    /// No markdown file exists for the slug.
    #[error("note not found: {0}")]
    NotFound(String),
    /// Configuration could not be applied.
    #[error("config error: {0}")]
    Config(String),
}
