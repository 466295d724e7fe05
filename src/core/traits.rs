//! Core traits and types for tarball publishing
//!
//! The package-manager CLI is the one external process this crate drives.
//! [`PackageManager`] is the seam between the publish loop and that process,
//! so the loop can be exercised without a real registry.

use crate::security::command_executor::CommandError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One `publish` call for a single tarball
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishInvocation {
    /// Tarball handed to the CLI
    pub tarball: PathBuf,
    /// Flags derived for this tarball (`--tag`, `--access`, `--dry-run`)
    pub args: Vec<String>,
    /// Directory the CLI runs in
    pub working_dir: PathBuf,
}

impl PublishInvocation {
    /// Full argument vector: `publish <tarball> [args...]`
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = vec![OsString::from("publish"), self.tarball.clone().into_os_string()];
        argv.extend(self.args.iter().map(OsString::from));
        argv
    }
}

/// Package-manager CLI used to publish tarballs
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// CLI name (e.g., "npm")
    fn name(&self) -> &str;

    /// Locate the CLI executable
    ///
    /// Called once per run before any tarball is published. A lookup failure
    /// is fatal to the run.
    fn locate(&self) -> Result<PathBuf, CommandError>;

    /// Run the CLI at `program` for one tarball
    ///
    /// A non-zero exit status is an error.
    async fn publish(
        &self,
        program: &Path,
        invocation: &PublishInvocation,
    ) -> Result<(), CommandError>;
}
