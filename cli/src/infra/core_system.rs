//! Infrastructure implementation of the `CoreSystemRegistry` port backed by
//! the loaded `config.yaml`.

use crate::application::ports::CoreSystemRegistry;
use crate::domain::config::{CoreSystemConfig, LcagentsConfig};

/// Answers core-system queries from a configuration snapshot.
#[derive(Debug, Clone, Default)]
pub struct ConfigCoreSystemRegistry {
    config: LcagentsConfig,
}

impl ConfigCoreSystemRegistry {
    #[must_use]
    pub fn new(config: LcagentsConfig) -> Self {
        Self { config }
    }
}

impl CoreSystemRegistry for ConfigCoreSystemRegistry {
    fn active_core_system(&self) -> Option<String> {
        self.config.core_system.clone()
    }

    fn active_core_config(&self) -> Option<CoreSystemConfig> {
        self.config.active_core_config()
    }
}
