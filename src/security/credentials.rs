//! Ephemeral registry credentials
//!
//! A run writes one `.npmrc` holding a single auth-token line for the target
//! registry, publishes, then removes the file. The token is kept in a
//! [`SecretString`] so it never shows up in `Debug` output or logs.
//!
//! # Example
//!
//! ```no_run
//! use tarball_publisher::security::credentials::{NpmCredentials, NpmrcGuard, write_npmrc};
//!
//! # async fn demo() -> std::io::Result<()> {
//! let path = std::path::PathBuf::from("/home/runner/.npmrc");
//! let _guard = NpmrcGuard::new(&path);
//! let credentials = NpmCredentials::new("registry.npmjs.org", "npm_secret");
//! write_npmrc(&path, &credentials).await?;
//! // ... publish ...
//! # Ok(())
//! # }
//! // dropping the guard removes the file
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Registry host (no scheme) and its auth token
#[derive(Debug)]
pub struct NpmCredentials {
    registry: String,
    token: SecretString,
}

impl NpmCredentials {
    pub fn new(registry: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            token: SecretString::from(token.into()),
        }
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// The single `.npmrc` line associating the token with the registry
    ///
    /// ```
    /// use tarball_publisher::security::credentials::NpmCredentials;
    ///
    /// let credentials = NpmCredentials::new("npm.pkg.github.com", "ghp_123");
    /// assert_eq!(credentials.npmrc_line(), "//npm.pkg.github.com/:_authToken=ghp_123");
    /// ```
    pub fn npmrc_line(&self) -> String {
        format!(
            "//{}/:_authToken={}",
            self.registry,
            self.token.expose_secret()
        )
    }
}

/// Overwrite `path` with the auth-token line for `credentials`
///
/// Creates or truncates the file. On Unix the file is left readable by its
/// owner only, including a pre-existing one with wider permissions. Fails when the parent directory is missing or the location
/// is not writable.
pub async fn write_npmrc(path: &Path, credentials: &NpmCredentials) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    #[cfg(unix)]
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
        .await?;
    file.write_all(credentials.npmrc_line().as_bytes()).await?;
    file.flush().await?;

    Ok(())
}

/// Removes the credentials file when dropped
///
/// Removal runs on every exit path, including early returns and panics.
/// Errors are logged and otherwise ignored.
#[derive(Debug)]
pub struct NpmrcGuard {
    path: PathBuf,
}

impl NpmrcGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for NpmrcGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} was already absent", self.path.display())
            }
            Err(e) => tracing::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
