pub mod dataset;
pub mod paths;
pub mod preference;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub use dataset::DatasetConfig;
pub use paths::PathConfig;
pub use preference::PreferenceConfig;

/// Main configuration for conversation-tree data preparation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub preference: PreferenceConfig,
    pub paths: PathConfig,
    /// Seed for tree sampling; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            preference: PreferenceConfig::default(),
            paths: PathConfig::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn for_dataset(preset: &str) -> anyhow::Result<Self> {
        let dataset = DatasetConfig::from_preset(preset)?;
        let paths = PathConfig {
            output_dir: format!("data/processed/{}", preset),
            ..Default::default()
        };
        Ok(Self {
            dataset,
            paths,
            ..Default::default()
        })
    }

    /// Reads a JSON config file. Missing sections fall back to defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.dataset.split.is_empty() {
            anyhow::bail!("dataset.split must not be empty");
        }
        if !self.preference.rank_chosen.is_finite() || !self.preference.rank_rejected.is_finite() {
            anyhow::bail!(
                "preference ranks must be finite, got chosen={} rejected={}",
                self.preference.rank_chosen,
                self.preference.rank_rejected
            );
        }
        if self.preference.max_trees == Some(0) {
            anyhow::bail!("preference.max_trees must be > 0");
        }
        Ok(())
    }

    pub fn to_dict(&self) -> anyhow::Result<HashMap<String, serde_json::Value>> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_dict(data: HashMap<String, serde_json::Value>) -> anyhow::Result<Self> {
        let json = serde_json::to_string(&data)?;
        Ok(serde_json::from_str(&json)?)
    }
}
