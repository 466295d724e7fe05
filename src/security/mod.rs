pub mod command_executor;
pub mod credentials;

pub use command_executor::{CommandError, NpmExecutor};
pub use credentials::{NpmCredentials, NpmrcGuard, write_npmrc};
