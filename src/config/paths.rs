use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Path configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory holding flat JSONL exports
    pub data_dir: String,
    pub output_dir: String,
    /// HuggingFace hub cache root, used instead of `data_dir` when set
    pub cache_dir: Option<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            output_dir: "data/processed".to_string(),
            cache_dir: None,
        }
    }
}

impl PathConfig {
    pub fn single_step_file(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("single_step.jsonl")
    }

    pub fn pairs_file(&self, rank: f64) -> PathBuf {
        PathBuf::from(&self.output_dir).join(format!("pairs_rank{}.jsonl", rank))
    }

    pub fn preference_file(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("preferences.jsonl")
    }
}
