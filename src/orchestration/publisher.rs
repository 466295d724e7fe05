//! Tarball Publisher - Publishes every tarball under a directory
//!
//! A run goes through these steps in order, without going back:
//! - Locate the package-manager CLI
//! - Resolve inputs
//! - Write the registry credentials file
//! - Find candidate tarballs
//! - Publish each tarball, one at a time, collecting failures
//! - Decide the outcome
//!
//! The credentials file is removed when the run ends, whichever step it ends in.
//! A tarball that fails to publish does not stop the loop. The run fails only
//! when every candidate failed.

use crate::core::config::{PublishConfig, RawInputs};
use crate::core::error::{PublishError, Result};
use crate::core::traits::{PackageManager, PublishInvocation};
use crate::orchestration::discovery::find_tarballs;
use crate::security::credentials::{NpmrcGuard, write_npmrc};
use crate::validation::VersionTagger;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A tarball whose publish attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTarball {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of the publish loop
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishReport {
    /// Directory that was searched
    pub root: PathBuf,

    /// Every tarball found, in publish order
    pub candidates: Vec<PathBuf>,

    /// Tarballs the CLI accepted
    pub published: Vec<PathBuf>,

    /// Tarballs the CLI rejected, in publish order
    pub failed: Vec<FailedTarball>,

    /// Whether `--dry-run` was passed
    pub dry_run: bool,
}

impl PublishReport {
    pub fn failed_paths(&self) -> Vec<PathBuf> {
        self.failed.iter().map(|f| f.path.clone()).collect()
    }

    /// Every candidate failed. Never true for an empty candidate set.
    pub fn all_failed(&self) -> bool {
        !self.candidates.is_empty() && self.failed.len() == self.candidates.len()
    }

    /// Turn the report into the run result
    pub fn into_outcome(self) -> Result<Self> {
        if self.all_failed() {
            return Err(PublishError::all_failed(self.failed_paths()));
        }

        if self.candidates.is_empty() {
            tracing::warn!("No tarballs found under {}", self.root.display());
        } else if !self.failed.is_empty() {
            tracing::warn!(
                "{} of {} tarballs failed to publish",
                self.failed.len(),
                self.candidates.len()
            );
        }

        Ok(self)
    }
}

/// CLI flags for one tarball
///
/// Order is fixed: `--tag`, `--access`, `--dry-run`.
///
/// ```
/// use tarball_publisher::orchestration::publish_args;
///
/// assert_eq!(
///     publish_args(Some("beta"), Some("public"), true),
///     vec!["--tag", "beta", "--access", "public", "--dry-run"]
/// );
/// assert!(publish_args(None, None, false).is_empty());
/// ```
pub fn publish_args(tag: Option<&str>, access: Option<&str>, dry_run: bool) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(tag) = tag {
        args.push("--tag".to_string());
        args.push(tag.to_string());
    }

    if let Some(access) = access.filter(|a| !a.is_empty()) {
        args.push("--access".to_string());
        args.push(access.to_string());
    }

    if dry_run {
        args.push("--dry-run".to_string());
    }

    args
}

/// Publishes tarballs through a [`PackageManager`]
pub struct TarballPublisher<M> {
    package_manager: M,
    npmrc_path: PathBuf,
    cwd: PathBuf,
    tagger: VersionTagger,
}

impl<M: PackageManager> TarballPublisher<M> {
    /// Create a new TarballPublisher
    ///
    /// # Arguments
    ///
    /// * `package_manager` - CLI used to publish
    /// * `npmrc_path` - Where the credentials file is written, and removed from
    /// * `cwd` - Directory a relative `path` input resolves against
    pub fn new(package_manager: M, npmrc_path: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            package_manager,
            npmrc_path: npmrc_path.into(),
            cwd: cwd.into(),
            tagger: VersionTagger::new(),
        }
    }

    pub fn package_manager(&self) -> &M {
        &self.package_manager
    }

    /// Run the full publish flow for `inputs`
    ///
    /// Returns the report when at least one tarball was published or none
    /// were found. Fails on configuration, lookup and credential errors, and
    /// when every tarball failed.
    pub async fn run(&self, inputs: &RawInputs) -> Result<PublishReport> {
        let _npmrc = NpmrcGuard::new(&self.npmrc_path);
        tracing::debug!(".npmrc location: {}", self.npmrc_path.display());

        let program =
            self.package_manager
                .locate()
                .map_err(|source| PublishError::CliNotFound {
                    program: self.package_manager.name().to_string(),
                    source,
                })?;

        let config = PublishConfig::resolve(inputs, &self.cwd)?;
        tracing::debug!(
            "Resolved path to search for tarballs: {}",
            config.root.display()
        );

        write_npmrc(&self.npmrc_path, &config.credentials)
            .await
            .map_err(|source| PublishError::CredentialWrite {
                path: self.npmrc_path.clone(),
                source,
            })?;

        let candidates = find_tarballs(&config.root).await?;
        tracing::debug!(
            "Found files:\n{}",
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")
        );

        let report = self.publish_each(&program, &config, candidates).await;
        report.into_outcome()
    }

    /// Flags for `tarball` under `config`
    pub fn args_for(&self, config: &PublishConfig, tarball: &Path) -> Vec<String> {
        let tag = if config.use_tags {
            self.tagger.dist_tag(&tarball.to_string_lossy())
        } else {
            None
        };

        publish_args(tag.as_deref(), config.access.as_deref(), config.dry_run)
    }

    async fn publish_each(
        &self,
        program: &Path,
        config: &PublishConfig,
        candidates: Vec<PathBuf>,
    ) -> PublishReport {
        let mut report = PublishReport {
            root: config.root.clone(),
            dry_run: config.dry_run,
            ..PublishReport::default()
        };

        for tarball in &candidates {
            let invocation = PublishInvocation {
                tarball: tarball.clone(),
                args: self.args_for(config, tarball),
                working_dir: config.root.clone(),
            };

            tracing::info!("Publishing {}", tarball.display());
            tracing::debug!("Arguments: {:?}", invocation.args);

            match self.package_manager.publish(program, &invocation).await {
                Ok(()) => report.published.push(tarball.clone()),
                Err(e) => {
                    tracing::error!("Failed to publish {}: {}", tarball.display(), e);
                    report.failed.push(FailedTarball {
                        path: tarball.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.candidates = candidates;
        tracing::info!(
            "Published {} of {} tarballs",
            report.published.len(),
            report.candidates.len()
        );

        report
    }
}
