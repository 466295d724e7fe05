pub mod core;
pub mod orchestration;
pub mod security;
pub mod validation;

pub use self::core::*;
pub use orchestration::{PublishReport, TarballPublisher};
pub use security::{CommandError, NpmCredentials, NpmExecutor, NpmrcGuard};
