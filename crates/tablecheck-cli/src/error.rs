//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Engine error (configuration, launch, navigation)
    #[error(transparent)]
    Check(#[from] tablecheck::CheckError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization error
    #[error("Report serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Real browser requested from a build without it
    #[error("Browser support not enabled. Rebuild with --features browser or pass --demo")]
    BrowserUnavailable,

    /// At least one scenario failed
    #[error("{count} scenario(s) failed")]
    ScenariosFailed {
        /// Number of failed scenarios
        count: usize,
    },
}

impl CliError {
    /// Create a scenario failure error
    #[must_use]
    pub const fn scenarios_failed(count: usize) -> Self {
        Self::ScenariosFailed { count }
    }
}
