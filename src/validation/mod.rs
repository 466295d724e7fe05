pub mod version_tag;

pub use version_tag::{TARBALL_SUFFIX, VersionTagger};
