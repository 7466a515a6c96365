//! Configuration structs, defaults and file loading.

pub mod types;
pub mod persistence;

pub use persistence::{load_config, DEFAULT_CONFIG_PATH};
pub use types::AppConfig;
