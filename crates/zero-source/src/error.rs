//! Error types for zero-source.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading pages from disk.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The pages directory does not exist.
    #[error("pages directory not found: {0}")]
    NotFound(PathBuf),

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A front-matter block could not be parsed.
    #[error("invalid front-matter in {path}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    /// The file watcher could not be started.
    #[error("failed to watch pages: {0}")]
    Watch(#[from] notify::Error),
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
