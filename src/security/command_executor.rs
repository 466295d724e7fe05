//! Package-manager CLI execution
//!
//! # Security Features
//!
//! - **Injection prevention**: Uses `tokio::process::Command`, arguments are passed
//!   as a vector and never interpolated into a shell string
//! - **Resolved binary**: The CLI is located once through `PATH` and invoked by
//!   absolute path
//! - **Working directory validation**: Validates existence before execution
//!
//! The child inherits stdout and stderr so the CLI's own output lands in the
//! job log.

use crate::core::traits::{PackageManager, PublishInvocation};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Errors that can occur while running the CLI
#[derive(Error, Debug)]
pub enum CommandError {
    /// Executable is not on PATH
    #[error("Unable to locate executable file: {program}")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    /// Working directory does not exist or is not accessible
    #[error("Working directory does not exist: {}", .0.display())]
    InvalidWorkingDirectory(PathBuf),

    /// Process could not be spawned or awaited
    #[error("Command execution failed: {0}")]
    ExecutionFailed(#[from] std::io::Error),

    /// Process ran and reported failure
    #[error("The process '{}' failed with exit code {}", .program.display(), exit_code_label(.code))]
    NonZeroExit { program: PathBuf, code: Option<i32> },
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown (terminated by signal)".to_string(), |c| c.to_string())
}

/// npm, driven as a subprocess
#[derive(Debug, Clone)]
pub struct NpmExecutor {
    program: String,
}

impl Default for NpmExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl NpmExecutor {
    pub fn new() -> Self {
        Self::with_program("npm")
    }

    /// Use a different executable name, looked up on PATH like `npm`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl PackageManager for NpmExecutor {
    fn name(&self) -> &str {
        &self.program
    }

    fn locate(&self) -> Result<PathBuf, CommandError> {
        which::which(&self.program).map_err(|source| CommandError::NotFound {
            program: self.program.clone(),
            source,
        })
    }

    async fn publish(
        &self,
        program: &Path,
        invocation: &PublishInvocation,
    ) -> Result<(), CommandError> {
        if !invocation.working_dir.is_dir() {
            return Err(CommandError::InvalidWorkingDirectory(
                invocation.working_dir.clone(),
            ));
        }

        let status = Command::new(program)
            .args(invocation.argv())
            .current_dir(&invocation.working_dir)
            .status()
            .await?;

        if !status.success() {
            return Err(CommandError::NonZeroExit {
                program: program.to_path_buf(),
                code: status.code(),
            });
        }

        Ok(())
    }
}
