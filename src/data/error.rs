//! Error kinds raised by the data pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to retrieve split '{split}' of dataset '{dataset}': {reason}")]
    Retrieval {
        dataset: String,
        split: String,
        reason: String,
    },

    #[error("malformed conversation tree {tree_id}: {reason}")]
    DataIntegrity { tree_id: String, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DataError {
    pub fn retrieval(dataset: &str, split: &str, reason: impl Into<String>) -> Self {
        DataError::Retrieval {
            dataset: dataset.to_string(),
            split: split.to_string(),
            reason: reason.into(),
        }
    }

    pub fn integrity(tree_id: &str, reason: impl Into<String>) -> Self {
        DataError::DataIntegrity {
            tree_id: tree_id.to_string(),
            reason: reason.into(),
        }
    }
}
