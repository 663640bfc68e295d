//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{LcagentsConfig, set_config_value};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the configuration file exists but cannot be parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<LcagentsConfig> {
    store.load()
}

/// Save configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be written.
pub fn save_config(store: &impl ConfigStore, config: &LcagentsConfig) -> Result<()> {
    store.save(config)
}

/// Validate `key = value`, apply it, and persist the result.
///
/// # Errors
///
/// Returns a `ConfigError` for an unknown key or invalid value, or an I/O
/// error if loading or saving fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<LcagentsConfig> {
    let mut config = store.load()?;
    set_config_value(&mut config, key, value)?;
    store.save(&config)?;
    Ok(config)
}
