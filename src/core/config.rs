//! Run configuration
//!
//! Inputs arrive as plain strings keyed by name (`path`, `registry`, `token`,
//! `access`, `dryRun`, `useTags`), from command-line flags or from the
//! `INPUT_<NAME>` environment variables the host platform sets.
//! [`PublishConfig::resolve`] applies the required/optional policy and turns
//! them into typed settings.
//!
//! Boolean inputs follow a strict contract: they are enabled only when the
//! trimmed value is exactly `"true"`. `"TRUE"`, `"True"` or `"1"` are false.

use crate::core::error::{PublishError, Result};
use crate::security::credentials::NpmCredentials;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Input names as exposed by the host automation platform
pub const INPUT_PATH: &str = "path";
pub const INPUT_REGISTRY: &str = "registry";
pub const INPUT_TOKEN: &str = "token";
pub const INPUT_ACCESS: &str = "access";
pub const INPUT_DRY_RUN: &str = "dryRun";
pub const INPUT_USE_TAGS: &str = "useTags";

/// Environment variable the platform uses to pass an input
///
/// ```
/// use tarball_publisher::core::config::input_env_var;
///
/// assert_eq!(input_env_var("dryRun"), "INPUT_DRYRUN");
/// ```
pub fn input_env_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Unvalidated inputs, one optional string per key
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub path: Option<String>,
    pub registry: Option<String>,
    pub token: Option<String>,
    pub access: Option<String>,
    pub dry_run: Option<String>,
    pub use_tags: Option<String>,
}

impl RawInputs {
    /// Read every input from its `INPUT_*` environment variable
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read every input through `lookup`, keyed by environment variable name
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = |name: &str| lookup(&input_env_var(name));

        Self {
            path: input(INPUT_PATH),
            registry: input(INPUT_REGISTRY),
            token: input(INPUT_TOKEN),
            access: input(INPUT_ACCESS),
            dry_run: input(INPUT_DRY_RUN),
            use_tags: input(INPUT_USE_TAGS),
        }
    }

    /// Fill inputs missing from `self` with those of `fallback`
    pub fn or(self, fallback: RawInputs) -> Self {
        Self {
            path: self.path.or(fallback.path),
            registry: self.registry.or(fallback.registry),
            token: self.token.or(fallback.token),
            access: self.access.or(fallback.access),
            dry_run: self.dry_run.or(fallback.dry_run),
            use_tags: self.use_tags.or(fallback.use_tags),
        }
    }
}

/// Resolved settings for one publish run
#[derive(Debug)]
pub struct PublishConfig {
    /// Absolute directory searched for tarballs, also the npm working directory
    pub root: PathBuf,
    pub credentials: NpmCredentials,
    /// `--access` value, `None` when the input was empty
    pub access: Option<String>,
    pub dry_run: bool,
    pub use_tags: bool,
}

impl PublishConfig {
    /// Apply the input policy
    ///
    /// `cwd` is the directory a relative or missing `path` input resolves
    /// against.
    pub fn resolve(raw: &RawInputs, cwd: &Path) -> Result<Self> {
        let root = resolve_root(optional(&raw.path).as_deref(), cwd)?;

        let registry = required(&raw.registry, INPUT_REGISTRY)?;
        let token = required(&raw.token, INPUT_TOKEN)?;

        Ok(Self {
            root,
            credentials: NpmCredentials::new(registry, token),
            access: optional(&raw.access),
            dry_run: is_strict_true(&raw.dry_run),
            use_tags: is_strict_true(&raw.use_tags),
        })
    }
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

fn optional(value: &Option<String>) -> Option<String> {
    let value = trimmed(value);
    (!value.is_empty()).then(|| value.to_string())
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    optional(value).ok_or_else(|| PublishError::MissingInput {
        name: name.to_string(),
    })
}

fn is_strict_true(value: &Option<String>) -> bool {
    trimmed(value) == "true"
}

fn resolve_root(path: Option<&str>, cwd: &Path) -> Result<PathBuf> {
    let Some(path) = path else {
        return Ok(cwd.to_path_buf());
    };

    Path::new(path)
        .absolutize_from(cwd)
        .map(|resolved| resolved.into_owned())
        .map_err(|source| PublishError::InvalidPath {
            path: PathBuf::from(path),
            source,
        })
}
