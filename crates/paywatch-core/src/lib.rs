pub mod config;
pub mod error;
pub mod types;

pub use config::PaywatchConfig;
pub use error::{PaywatchError, Result};
pub use types::{ConnId, WebhookRecord};
