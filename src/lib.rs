// Autumn Library
// Layered runtime configuration for the Autumn sync server backend

pub mod config;

pub use config::{Config, ConfigError, Mode};

// Re-export commonly used types
pub use anyhow::{Context, Result};
pub use tracing::{debug, error, info, warn};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_HASH: &str = env!("GIT_HASH");
