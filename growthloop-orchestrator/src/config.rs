//! Runtime knobs for the workflow executor (SPEC_FULL.md "Configuration"),
//! mirroring `vibes_core::auth::AccessConfig`'s serde-default pattern.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_hard_timeout_secs() -> u64 {
    600
}

fn default_soft_timeout_secs() -> u64 {
    540
}

fn default_image_enricher_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_hard_timeout_secs")]
    pub task_hard_timeout_secs: u64,
    #[serde(default = "default_soft_timeout_secs")]
    pub task_soft_timeout_secs: u64,
    #[serde(default = "default_image_enricher_timeout_secs")]
    pub image_enricher_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            task_hard_timeout_secs: default_hard_timeout_secs(),
            task_soft_timeout_secs: default_soft_timeout_secs(),
            image_enricher_timeout_secs: default_image_enricher_timeout_secs(),
        }
    }
}

impl OrchestratorConfig {
    #[must_use]
    pub fn hard_timeout(&self) -> Duration {
        Duration::from_secs(self.task_hard_timeout_secs)
    }

    #[must_use]
    pub fn soft_timeout(&self) -> Duration {
        Duration::from_secs(self.task_soft_timeout_secs)
    }

    #[must_use]
    pub fn image_enricher_timeout(&self) -> Duration {
        Duration::from_secs(self.image_enricher_timeout_secs)
    }
}
