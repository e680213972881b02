use std::fs;
use std::path::Path;

use crate::config::settings::ClientConfig;
use crate::error::{Error, Result};

/// Load and validate client config from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read '{}': {e}", path.display())))?;
    let config: ClientConfig = serde_yaml::from_str(&raw)
        .map_err(|e| Error::Config(format!("failed to parse '{}': {e}", path.display())))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &ClientConfig) -> Result<()> {
    if config.timeout_seconds == 0 {
        return Err(Error::Config("timeout_seconds must be positive".into()));
    }
    if config.token_url.is_empty() {
        return Err(Error::Config("token_url must not be empty".into()));
    }
    if config.api_base_url.is_empty() {
        return Err(Error::Config("api_base_url must not be empty".into()));
    }
    if let Some(proxy) = &config.proxy {
        if proxy.url.is_empty() {
            return Err(Error::Config("proxy.url must not be empty".into()));
        }
    }
    Ok(())
}
