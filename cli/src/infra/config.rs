//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::LcagentsConfig;

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    /// Store backed by the file at `path` (normally `.lcagents/config.yaml`).
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<LcagentsConfig> {
        if !self.path.exists() {
            return Ok(LcagentsConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(LcagentsConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }

    fn save(&self, config: &LcagentsConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;

        // Write to a sibling temp file, then rename over the original.
        let temp_path = self.path.with_extension("yaml.tmp");
        std::fs::write(&temp_path, content)
            .with_context(|| format!("cannot write {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }
}
