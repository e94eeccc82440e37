mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

/// Loads configuration from `CONFIG_PATH` (default `config.yaml`), then
/// applies environment overrides. A missing file yields the defaults.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = load_from(&config_path).await?;
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    if !tokio::fs::try_exists(path).await? {
        debug!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let config_str = tokio::fs::read_to_string(path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

/// Applies `PORT`, `MEDITRIAGE_HOST` and `MODEL_PATH` on top of the file values.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("PORT must be a port number, got '{}'", port)))?;
    }
    if let Some(host) = lookup("MEDITRIAGE_HOST") {
        config.server.host = host;
    }
    if let Some(model_path) = lookup("MODEL_PATH") {
        config.model.path = model_path;
    }
    Ok(())
}
