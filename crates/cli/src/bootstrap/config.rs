use fastdns_domain::{CliOverrides, Config};

/// Runs before logging is up; failures surface through `main`'s error.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}
