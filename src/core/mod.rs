pub mod config;
pub mod error;
pub mod traits;
pub mod workflow;

pub use config::{PublishConfig, RawInputs};
pub use error::*;
pub use traits::*;
