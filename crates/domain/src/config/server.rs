use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    /// Number of UDP listeners. Defaults to the CPU count; always 1 where
    /// the kernel cannot balance datagrams across SO_REUSEPORT sockets.
    #[serde(default)]
    pub listeners: Option<usize>,

    /// Cumulative listener exits tolerated before the server gives up.
    #[serde(default = "default_max_restarts")]
    pub max_restarts: usize,

    #[serde(default = "default_worker_idle_timeout_secs")]
    pub worker_idle_timeout_secs: u64,

    #[serde(default = "default_read_backoff_ms")]
    pub read_backoff_ms: u64,

    #[serde(default = "default_recv_buffer_size")]
    pub recv_buffer_size: usize,

    /// DNS-over-HTTPS adapter port; disabled when unset.
    #[serde(default)]
    pub doh_port: Option<u16>,
}

impl ServerConfig {
    pub fn worker_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_idle_timeout_secs)
    }

    pub fn read_backoff(&self) -> Duration {
        Duration::from_millis(self.read_backoff_ms)
    }

    pub fn bind_ip(&self) -> Result<IpAddr, ConfigError> {
        self.bind_address.parse().map_err(|_| {
            ConfigError::Validation(format!("Invalid bind address: {}", self.bind_address))
        })
    }

    pub fn dns_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.dns_port))
    }

    /// DNS-over-HTTPS listen address, when the adapter is enabled.
    pub fn doh_addr(&self) -> Result<Option<SocketAddr>, ConfigError> {
        match self.doh_port {
            Some(port) => Ok(Some(SocketAddr::new(self.bind_ip()?, port))),
            None => Ok(None),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            dns_port: default_dns_port(),
            listeners: None,
            max_restarts: default_max_restarts(),
            worker_idle_timeout_secs: default_worker_idle_timeout_secs(),
            read_backoff_ms: default_read_backoff_ms(),
            recv_buffer_size: default_recv_buffer_size(),
            doh_port: None,
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_dns_port() -> u16 {
    53
}

fn default_max_restarts() -> usize {
    200
}

fn default_worker_idle_timeout_secs() -> u64 {
    60
}

fn default_read_backoff_ms() -> u64 {
    10
}

fn default_recv_buffer_size() -> usize {
    4096
}
