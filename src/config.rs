use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Resolved server configuration with all values filled in (no Options).
///
/// Built once at startup and handed to the router; nothing reads configuration
/// from globals. Can be deserialized by the TOML loader, where every key is
/// optional and falls back to the default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    pub host: String,
    /// Port to bind the HTTP listener to
    pub port: u16,

    // Remote fetch
    /// Timeout in seconds for fetching a remote feed
    pub fetch_timeout_secs: u64,
    /// Largest remote feed body accepted, in bytes
    pub max_download_bytes: usize,

    // Uploads
    /// Largest request body accepted on the upload endpoint, in bytes
    pub max_upload_bytes: usize,

    /// Fallback log filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            fetch_timeout_secs: 30,
            max_download_bytes: 50 * 1024 * 1024,
            max_upload_bytes: 50 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// Keys missing from the file keep their defaults. Unknown keys are
    /// rejected so that typos are not silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read, and `InvalidInput` if the
    /// TOML is malformed, has unknown keys, or fails [`ServerConfig::validate`].
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks that limits and timeouts are positive and the host is an IP address.
    pub fn validate(&self) -> AppResult<()> {
        if self.fetch_timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Fetch timeout must be greater than 0".into(),
            ));
        }
        if self.max_download_bytes == 0 {
            return Err(AppError::InvalidInput(
                "Max download size must be greater than 0".into(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(AppError::InvalidInput(
                "Max upload size must be greater than 0".into(),
            ));
        }
        self.bind_address()?;
        Ok(())
    }

    /// Returns the socket address the server listens on.
    pub fn bind_address(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| AppError::InvalidInput(format!("Invalid host '{}': {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
