//! Version Tagger - Derives an npm dist-tag from a tarball path
//!
//! A tarball named `pkg-1.2.3-beta.1.tgz` should land on the `beta`
//! dist-tag instead of `latest`. The tagger finds a semver-shaped token in
//! the path, drops the tarball suffix the permissive pattern swallows, parses
//! the prerelease identifiers and returns the first one.
//!
//! # Example
//!
//! ```
//! use tarball_publisher::validation::version_tag::VersionTagger;
//!
//! let tagger = VersionTagger::new();
//!
//! assert_eq!(tagger.dist_tag("/dist/pkg-1.2.3-beta.1.tgz"), Some("beta".to_string()));
//! assert_eq!(tagger.dist_tag("/dist/pkg-1.2.3.tgz"), None);
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use semver::Version;

/// Tarball file suffix
pub const TARBALL_SUFFIX: &str = ".tgz";

lazy_static! {
    /// Semver-shaped token anywhere in a string, optional leading `v`
    ///
    /// Prerelease and build segments accept any run of dot-separated
    /// alphanumerics, so a trailing `.tgz` is captured along with them.
    static ref SEMVER_PATTERN: Regex = Regex::new(
        r"(?i)\bv?(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)(?:-[\da-z-]+(?:\.[\da-z-]+)*)?(?:\+[\da-z-]+(?:\.[\da-z-]+)*)?\b"
    )
    .expect("semver pattern is valid");
}

/// Dist-tag inference from version strings embedded in file paths
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionTagger;

impl VersionTagger {
    pub fn new() -> Self {
        Self
    }

    /// First semver-shaped token in `text`, with the tarball suffix removed
    ///
    /// ```
    /// use tarball_publisher::validation::version_tag::VersionTagger;
    ///
    /// let tagger = VersionTagger::new();
    /// assert_eq!(tagger.extract_version("pkg-2.0.0-rc.1.tgz").as_deref(), Some("2.0.0-rc.1"));
    /// assert_eq!(tagger.extract_version("pkg.tgz"), None);
    /// ```
    pub fn extract_version(&self, text: &str) -> Option<String> {
        let matched = SEMVER_PATTERN.find(text)?;
        Some(matched.as_str().replacen(TARBALL_SUFFIX, "", 1))
    }

    /// Prerelease identifiers of `version`, `None` when it is not valid semver
    ///
    /// A leading `v` is accepted.
    pub fn prerelease_identifiers(&self, version: &str) -> Option<Vec<String>> {
        let version = version
            .strip_prefix(['v', 'V'])
            .unwrap_or(version);
        let parsed = Version::parse(version).ok()?;

        if parsed.pre.is_empty() {
            return Some(Vec::new());
        }

        Some(parsed.pre.as_str().split('.').map(str::to_string).collect())
    }

    /// Dist-tag for a tarball at `path`
    ///
    /// Returns the first prerelease identifier of the version found in the
    /// path, or `None` when there is no version or it is a plain release.
    pub fn dist_tag(&self, path: &str) -> Option<String> {
        let version = self.extract_version(path)?;
        self.prerelease_identifiers(&version)?.into_iter().next()
    }
}
