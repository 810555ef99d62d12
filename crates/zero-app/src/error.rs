//! Error types for zero-app.

use thiserror::Error;
use zero_router::{BuildError, DiscoveryError};

/// Errors that can occur while starting or rebuilding a site.
#[derive(Error, Debug)]
pub enum SiteError {
    /// Page discovery failed.
    #[error("page discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Route building failed.
    #[error("route build failed: {0}")]
    Build(#[from] BuildError),

    /// Mounting into a live document failed.
    #[error("mount failed: {0}")]
    Mount(#[from] MountError),
}

/// Errors raised by a live document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// Existing markup did not match the rendered tree.
    #[error("hydration mismatch in #{container}")]
    Hydration {
        /// Container id.
        container: String,
    },

    /// The document refused the tree.
    #[error("could not commit to #{container}: {message}")]
    Commit {
        /// Container id.
        container: String,
        /// Reason given by the document.
        message: String,
    },
}
