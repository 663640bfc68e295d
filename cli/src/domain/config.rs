//! Domain types and validators for lcagents configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::layer::validate_resource_name;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &["core-system", "backups.dir"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `.lcagents/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct LcagentsConfig {
    /// Identifier of the active core system (`core/.<id>/`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_system: Option<String>,
    /// Known core systems keyed by identifier.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub core_systems: BTreeMap<String, CoreSystemConfig>,
    /// Backup settings.
    pub backups: BackupConfig,
}

/// Description of an installed core system.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CoreSystemConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Backup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BackupConfig {
    /// Backup directory relative to the lcagents root. Defaults to `backups`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl LcagentsConfig {
    /// Configuration of the active core system. A core system that is
    /// active but not described in `core-systems` gets an empty config.
    #[must_use]
    pub fn active_core_config(&self) -> Option<CoreSystemConfig> {
        let active = self.core_system.as_deref()?;
        Some(self.core_systems.get(active).cloned().unwrap_or_default())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    match key {
        "core-system" => {
            if validate_resource_name(value).is_err() {
                return Err(invalid("must be a plain name such as 'bmad-core'").into());
            }
        }
        "backups.dir" => {
            let path = std::path::Path::new(value);
            if value.is_empty() || path.is_absolute() || value.contains("..") {
                return Err(invalid("must be a relative path inside the lcagents root").into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validate and apply `key = value` to `config`.
///
/// # Errors
///
/// Returns an error if the key or value is invalid.
pub fn set_config_value(config: &mut LcagentsConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    match key {
        "core-system" => config.core_system = Some(value.to_string()),
        "backups.dir" => config.backups.dir = Some(value.to_string()),
        _ => {}
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
