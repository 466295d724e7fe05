//! Error handling for tarball publishing
//!
//! Fatal conditions of a run are collected in [`PublishError`]. Failures of a
//! single `npm publish` invocation are reported as
//! [`CommandError`] and only escalate here, as
//! [`PublishError::AllFailed`], when every tarball failed.

use crate::security::command_executor::CommandError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a publish run
#[derive(Error, Debug)]
pub enum PublishError {
    // Configuration errors
    #[error("Input required and not supplied: {name}")]
    MissingInput { name: String },

    #[error("HOME is not set; cannot determine the .npmrc location")]
    HomeNotSet,

    #[error("Cannot resolve path '{}': {source}", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Lookup errors
    #[error("{program} is required to publish tarballs but was not found")]
    CliNotFound {
        program: String,
        #[source]
        source: CommandError,
    },

    // Credential errors
    #[error("Failed to write credentials to '{}': {source}", .path.display())]
    CredentialWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Discovery errors
    #[error("Failed to search for tarballs under '{}': {message}", .root.display())]
    Discovery { root: PathBuf, message: String },

    // Outcome
    #[error("All tarballs failed to publish: {listing}.")]
    AllFailed { files: Vec<PathBuf>, listing: String },
}

impl PublishError {
    /// Build an [`PublishError::AllFailed`] listing the failed paths as a JSON array
    pub fn all_failed(files: Vec<PathBuf>) -> Self {
        let names: Vec<String> = files
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        let listing = serde_json::to_string(&names).unwrap_or_else(|_| names.join(", "));

        Self::AllFailed { files, listing }
    }

    /// Check if this error comes from the run configuration rather than the registry
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. } | Self::HomeNotSet | Self::InvalidPath { .. }
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::MissingInput { .. } => vec![
                "Pass the value with the matching --flag",
                "Or set the INPUT_<NAME> environment variable",
            ],
            Self::HomeNotSet => vec![
                "Set the HOME environment variable",
                "Or pass --npmrc with an explicit credentials path",
            ],
            Self::InvalidPath { .. } => vec!["Check the path input"],
            Self::CliNotFound { .. } => vec![
                "Install Node.js and npm on the runner",
                "Make sure npm is on PATH",
            ],
            Self::CredentialWrite { .. } => vec![
                "Check that the parent directory of the .npmrc exists",
                "Check that the location is writable",
            ],
            Self::Discovery { .. } => vec!["Check that the path input points to a readable directory"],
            Self::AllFailed { .. } => vec![
                "Check the npm output above for each tarball",
                "Verify the registry and token inputs",
                "Make sure the versions are not already published",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "MISSING_INPUT",
            Self::HomeNotSet => "HOME_NOT_SET",
            Self::InvalidPath { .. } => "INVALID_PATH",
            Self::CliNotFound { .. } => "CLI_NOT_FOUND",
            Self::CredentialWrite { .. } => "CREDENTIAL_WRITE",
            Self::Discovery { .. } => "DISCOVERY_FAILED",
            Self::AllFailed { .. } => "ALL_FAILED",
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
