//! CLI error types.

use centro_client::{ConfigError, ErrorOutcome};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// The backend call failed. Displays the backend's message as is.
    #[error("{0}")]
    Api(#[from] ErrorOutcome),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Returns true if the failure logged the user out.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(outcome) if outcome.is_unauthorized())
    }
}
