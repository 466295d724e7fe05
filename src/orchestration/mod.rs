//! Orchestration layer for tarball publishing
//!
//! Finds the tarballs under a directory and drives the publish loop over them.

pub mod discovery;
pub mod publisher;

pub use discovery::find_tarballs;
pub use publisher::{FailedTarball, PublishReport, TarballPublisher, publish_args};
