use serde::{Deserialize, Serialize};
use std::path::Path;

use super::answers::AnswersConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;

const LOCAL_CONFIG: &str = "fastdns.toml";
const SYSTEM_CONFIG: &str = "/etc/fastdns/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener, worker pool and supervisor settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Addresses returned by the bundled handler
    #[serde(default)]
    pub answers: AnswersConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. fastdns.toml in current directory
    /// 3. /etc/fastdns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG).exists() {
            Self::from_file(LOCAL_CONFIG)?
        } else if Path::new(SYSTEM_CONFIG).exists() {
            Self::from_file(SYSTEM_CONFIG)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(listeners) = overrides.listeners {
            self.server.listeners = Some(listeners);
        }
        if let Some(port) = overrides.doh_port {
            self.server.doh_port = Some(port);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        self.server.bind_ip()?;

        if self.server.doh_port == Some(0) {
            return Err(ConfigError::Validation("DoH port cannot be 0".to_string()));
        }

        if self.server.listeners == Some(0) {
            return Err(ConfigError::Validation(
                "Listener count cannot be 0".to_string(),
            ));
        }

        if self.server.max_restarts == 0 {
            return Err(ConfigError::Validation(
                "max_restarts must be at least 1".to_string(),
            ));
        }

        if self.server.recv_buffer_size < 512 {
            return Err(ConfigError::Validation(format!(
                "recv_buffer_size {} is below the 512-byte UDP minimum",
                self.server.recv_buffer_size
            )));
        }

        self.answers.ipv4_addrs()?;
        self.answers.ipv6_addrs()?;

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub listeners: Option<usize>,
    pub doh_port: Option<u16>,
    pub log_level: Option<String>,
}
