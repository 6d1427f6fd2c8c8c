use fastdns_domain::config::ServerConfig;
use fastdns_domain::{CliOverrides, Config, ConfigError};
use std::net::SocketAddr;
use std::time::Duration;

#[test]
fn test_server_config_default_values() {
    let config = ServerConfig::default();

    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.dns_port, 53);
    assert!(config.listeners.is_none());
    assert_eq!(config.max_restarts, 200);
    assert_eq!(config.worker_idle_timeout(), Duration::from_secs(60));
    assert_eq!(config.read_backoff(), Duration::from_millis(10));
    assert_eq!(config.recv_buffer_size, 4096);
    assert!(config.doh_port.is_none());
    assert_eq!(config.dns_addr().unwrap(), "0.0.0.0:53".parse::<SocketAddr>().unwrap());
    assert!(config.doh_addr().unwrap().is_none());
}

#[test]
fn test_ipv6_bind_address() {
    let config = ServerConfig {
        bind_address: "::".to_string(),
        dns_port: 5353,
        doh_port: Some(8053),
        ..ServerConfig::default()
    };

    assert_eq!(config.dns_addr().unwrap(), "[::]:5353".parse::<SocketAddr>().unwrap());
    assert_eq!(config.doh_addr().unwrap(), Some("[::]:8053".parse::<SocketAddr>().unwrap()));
}

#[test]
fn test_validate_rejects_bad_bind_address() {
    let mut config = Config::default();
    config.server.bind_address = "localhost".to_string();

    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    assert!(config.server.dns_addr().is_err());
}

#[test]
fn test_default_answers_match_bundled_handler() {
    let config = Config::default();

    let v4 = config.answers.ipv4_addrs().unwrap();
    assert_eq!(v4.len(), 2);
    assert_eq!(v4[0].octets(), [8, 8, 8, 8]);
    assert_eq!(v4[1].octets(), [8, 8, 4, 4]);
    assert!(config.answers.ipv6_addrs().unwrap().is_empty());
    assert_eq!(config.answers.ttl, 300);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = Config::from_toml(
        r#"
        [server]
        dns_port = 5353
        listeners = 4

        [answers]
        ipv6 = ["2001:4860:4860::8888"]
        "#,
    )
    .unwrap();

    assert_eq!(config.server.dns_port, 5353);
    assert_eq!(config.server.listeners, Some(4));
    assert_eq!(config.server.max_restarts, 200);
    assert_eq!(config.answers.ipv4.len(), 2);
    assert_eq!(config.answers.ipv6_addrs().unwrap().len(), 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_toml_is_default_config() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config.server.dns_port, 53);
    assert!(config.validate().is_ok());
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let result = Config::from_toml("[server\ndns_port = ");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_validate_rejects_zero_port() {
    let mut config = Config::default();
    config.server.dns_port = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_validate_rejects_zero_listeners() {
    let mut config = Config::default();
    config.server.listeners = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_restart_budget() {
    let mut config = Config::default();
    config.server.max_restarts = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_small_receive_buffer() {
    let mut config = Config::default();
    config.server.recv_buffer_size = 256;
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("512"), "unexpected message: {}", err);
}

#[test]
fn test_validate_rejects_bad_answer_address() {
    let mut config = Config::default();
    config.answers.ipv4 = vec!["not-an-ip".to_string()];
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("not-an-ip"));
}

#[test]
fn test_load_with_missing_file_fails() {
    let result = Config::load(Some("/nonexistent/fastdns.toml"), CliOverrides::default());
    assert!(matches!(result, Err(ConfigError::FileRead(_, _))));
}

#[test]
fn test_cli_overrides_win_over_file() {
    let path = std::env::temp_dir().join(format!("fastdns-config-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[server]\ndns_port = 5300\nbind_address = \"127.0.0.1\"\n",
    )
    .unwrap();

    let config = Config::load(
        path.to_str(),
        CliOverrides {
            dns_port: Some(5301),
            listeners: Some(2),
            log_level: Some("debug".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.server.dns_port, 5301);
    assert_eq!(config.server.bind_address, "127.0.0.1");
    assert_eq!(config.server.listeners, Some(2));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_errors_describe_the_failure() {
    let missing = "/nonexistent/fastdns/missing.toml";
    let err = Config::load(Some(missing), CliOverrides::default()).unwrap_err();
    assert!(err.to_string().starts_with("Cannot read config file"));
    assert!(err.to_string().contains(missing));

    let err = Config::from_toml("[server]\ndns_port = \"x\"").unwrap_err();
    assert!(err.to_string().starts_with("Invalid config file"));
}
