//! Daemon configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via DPCTL_CONFIG)
//! 3. Environment variables (DPCTL_BIND, DPCTL_SOCKET)

use dpctl_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {}: {}", .0.display(), .1)]
    Parse(PathBuf, String),
}

/// Daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP API configuration.
    pub http: HttpConfig,
    /// Dataplane connection configuration.
    pub dataplane: DataplaneConfig,
}

impl Config {
    /// Loads configuration from file, then applies environment variable
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("DPCTL_CONFIG") {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("DPCTL_BIND") {
            if let Ok(parsed) = addr.parse() {
                self.http.bind_addr = parsed;
            }
        }
        if let Ok(socket) = std::env::var("DPCTL_SOCKET") {
            self.dataplane.socket = PathBuf::from(socket);
        }
    }

    /// The correlation-engine deadlines derived from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_open_timeout(Duration::from_secs(self.dataplane.open_timeout_secs))
            .with_request_timeout(Duration::from_secs(self.dataplane.request_timeout_secs))
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
        }
    }
}

/// Dataplane connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataplaneConfig {
    /// Path to the dataplane DCP socket.
    pub socket: PathBuf,
    /// Stream acquisition timeout in seconds.
    pub open_timeout_secs: u64,
    /// Per-receive reply timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DataplaneConfig {
    fn default() -> Self {
        Self {
            socket: PathBuf::from("/run/dataplane/dcp.sock"),
            open_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.http.bind_addr.port(), 8080);
        assert_eq!(
            config.dataplane.socket,
            PathBuf::from("/run/dataplane/dcp.sock")
        );
        assert_eq!(config.dataplane.request_timeout_secs, 30);
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("dpctl-config-{}.yaml", std::process::id()));
        std::fs::write(
            &path,
            "http:\n  bind_addr: 0.0.0.0:9090\ndataplane:\n  socket: /tmp/dcp.sock\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.http.bind_addr.port(), 9090);
        assert_eq!(config.dataplane.socket, PathBuf::from("/tmp/dcp.sock"));
        // Unspecified fields keep their defaults.
        assert_eq!(config.dataplane.open_timeout_secs, 10);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/dpctl.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_client_config_derivation() {
        let mut config = Config::default();
        config.dataplane.open_timeout_secs = 3;
        config.dataplane.request_timeout_secs = 7;

        let client = config.client_config();
        assert_eq!(client.open_timeout, Duration::from_secs(3));
        assert_eq!(client.request_timeout, Duration::from_secs(7));
    }
}
