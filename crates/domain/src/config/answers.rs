use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

use super::errors::ConfigError;

/// Static addresses served for A and AAAA questions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswersConfig {
    #[serde(default = "default_ipv4")]
    pub ipv4: Vec<String>,

    #[serde(default)]
    pub ipv6: Vec<String>,

    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl AnswersConfig {
    pub fn ipv4_addrs(&self) -> Result<Vec<Ipv4Addr>, ConfigError> {
        self.ipv4
            .iter()
            .map(|s| {
                s.parse()
                    .map_err(|_| ConfigError::Validation(format!("Invalid IPv4 answer: {}", s)))
            })
            .collect()
    }

    pub fn ipv6_addrs(&self) -> Result<Vec<Ipv6Addr>, ConfigError> {
        self.ipv6
            .iter()
            .map(|s| {
                s.parse()
                    .map_err(|_| ConfigError::Validation(format!("Invalid IPv6 answer: {}", s)))
            })
            .collect()
    }
}

impl Default for AnswersConfig {
    fn default() -> Self {
        Self {
            ipv4: default_ipv4(),
            ipv6: Vec::new(),
            ttl: default_ttl(),
        }
    }
}

fn default_ipv4() -> Vec<String> {
    vec!["8.8.8.8".to_string(), "8.8.4.4".to_string()]
}

fn default_ttl() -> u32 {
    300
}
