//! Error types for discovery and route building.

use thiserror::Error;
use zero_core::DataError;

/// Errors that abort a discovery pass.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A page module failed to load.
    #[error("Failed to load page module '{key}': {message}")]
    Load { key: String, message: String },

    /// The match filter is not a valid glob.
    #[error("Invalid match pattern '{pattern}': {source}")]
    Filter {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Errors that abort a route build.
#[derive(Error, Debug)]
pub enum BuildError {
    /// An initial-data hook failed.
    #[error("Initial props for '{key}' ({href}) failed: {source}")]
    InitialProps {
        key: String,
        href: String,
        #[source]
        source: DataError,
    },
}
