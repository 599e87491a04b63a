//! Application configuration loaded from a YAML file.
//!
//! Only the identity provider needs configuration (its API key); the feed
//! endpoints and category table are fixed. The config file is optional for
//! everything except the `auth` commands.
//!
//! ```yaml
//! identity:
//!   api_key: "AIza..."
//! ```

use serde::Deserialize;
use std::error::Error;
use std::fs;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub identity: IdentityConfig,
}

/// Static identifiers for the identity provider project.
#[derive(Debug, Deserialize)]
pub struct IdentityConfig {
    pub api_key: String,
}

/// Load the config file at `path`.
#[instrument(level = "info")]
pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&raw)?;
    debug!("Loaded configuration");
    Ok(config)
}
