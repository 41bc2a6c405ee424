//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use serde::Deserialize;

use crate::server::error::Error;
use crate::stream::DEFAULT_BUFFER_SIZE;

/// HTTP server configuration.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The document root served to clients.
    pub root: PathBuf,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size.
    pub read_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 9999)),
            root: PathBuf::from("."),
            max_connections: 1024,
            read_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the values that would make the server unusable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_connections == 0 {
            return Err(Error::ConfigError("max_connections must be at least 1".to_string()));
        }
        if self.read_buffer_size == 0 {
            return Err(Error::ConfigError("read_buffer_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
