//! Server configuration
//!
//! Built-in defaults overlaid by `LAZ_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "LAZ";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DATABASE_FILE_NAME: &str = "laz.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub database_path: PathBuf,
    pub max_connections: u32,
}

impl Config {
    /// Load configuration from defaults and the process environment
    pub fn load() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Overlay `environment` on the built-in defaults
    pub fn from_environment(environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default(
                "database_path",
                default_database_path().to_string_lossy().to_string(),
            )?
            .set_default("max_connections", DEFAULT_MAX_CONNECTIONS as i64)?
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Failed to parse bind address: {}", self.bind_address))
    }
}

/// `<install dir>/../data/laz.db`, where the install dir holds the running binary
pub fn default_database_path() -> PathBuf {
    let install_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    install_dir.join("..").join("data").join(DATABASE_FILE_NAME)
}
