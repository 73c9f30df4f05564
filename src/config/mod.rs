// Configuration: TOML file with serde defaults for every field

pub mod loader;
pub mod types;

pub use types::{LoggingConfig, ResponseConfig, SlashConfig, SyncConfig};
