use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which dataset split to load and how to narrow it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub name: String,
    pub split: String,
    /// Keep only records in this language. `None` keeps every language.
    pub lang: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name: "OpenAssistant/oasst1".to_string(),
            split: "train".to_string(),
            lang: Some("en".to_string()),
        }
    }
}

impl DatasetConfig {
    pub fn from_preset(preset: &str) -> anyhow::Result<Self> {
        let dataset = AVAILABLE_DATASETS.get(preset).ok_or_else(|| {
            let mut known: Vec<_> = AVAILABLE_DATASETS.keys().collect();
            known.sort();
            anyhow::anyhow!("Unknown dataset preset: {}. Available: {:?}", preset, known)
        })?;

        Ok(Self {
            name: dataset
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            ..Default::default()
        })
    }
}

/// Known conversation-tree datasets with flat message exports
pub static AVAILABLE_DATASETS: Lazy<HashMap<String, serde_json::Map<String, serde_json::Value>>> =
    Lazy::new(|| {
        use serde_json::json;
        let mut datasets = HashMap::new();

        let mut insert = |key: &str, value: serde_json::Value| {
            if let serde_json::Value::Object(map) = value {
                datasets.insert(key.to_string(), map);
            }
        };

        insert(
            "oasst1",
            json!({
                "name": "OpenAssistant/oasst1",
                "description": "OpenAssistant Conversations, first release (2023-04-12)",
                "splits": ["train", "validation"],
            }),
        );

        insert(
            "oasst2",
            json!({
                "name": "OpenAssistant/oasst2",
                "description": "OpenAssistant Conversations, second release (2023-11-05)",
                "splits": ["train", "validation"],
            }),
        );

        datasets
    });
