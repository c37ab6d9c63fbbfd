//! Prompt/answer pair tables
//!
//! A pair table joins each conversation root with the reply holding a given
//! rank in the same tree. Trees with no reply at that rank contribute no row.

use super::error::DataError;
use super::export::write_jsonl;
use super::record::{Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One (prompt, answer) row, keyed by the tree it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRow {
    pub tree_id: String,
    pub prompt_id: String,
    pub prompt_text: String,
    pub answer_id: String,
    pub answer_text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairTable {
    rows: Vec<PairRow>,
}

impl PairTable {
    pub fn new(rows: Vec<PairRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PairRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PairRow> {
        self.rows.iter()
    }

    pub fn get(&self, tree_id: &str) -> Option<&PairRow> {
        self.rows.iter().find(|row| row.tree_id == tree_id)
    }

    /// Index for joins on `tree_id`. Rows are unique per tree by construction.
    pub fn by_tree(&self) -> HashMap<&str, &PairRow> {
        self.rows
            .iter()
            .map(|row| (row.tree_id.as_str(), row))
            .collect()
    }

    pub fn to_jsonl(&self, path: &Path) -> Result<(), DataError> {
        write_jsonl(path, &self.rows)
    }
}

/// Open-interval match `rank - 0.5 < r < rank + 0.5`. Integral ranks stored
/// as floats compare equal without an epsilon; a missing rank never matches.
pub fn rank_matches(record_rank: Option<f64>, rank: f64) -> bool {
    match record_rank {
        Some(r) => r > rank - 0.5 && r < rank + 0.5,
        None => false,
    }
}

/// Pairs each root prompt with the reply of the same tree at `rank`.
///
/// Returns `DataError::DataIntegrity` when a tree has more than one root or
/// more than one reply at `rank`. Replies whose tree has no root in `records`
/// are ignored. Rows follow the order of roots in `records`.
pub fn build_pairs(records: &RecordSet, rank: f64) -> Result<PairTable, DataError> {
    if !rank.is_finite() {
        return Err(DataError::InvalidArgument(format!(
            "rank must be finite, got {}",
            rank
        )));
    }

    let mut prompts: Vec<&Record> = Vec::new();
    let mut prompt_trees: HashMap<&str, &Record> = HashMap::new();
    let mut answers: HashMap<&str, &Record> = HashMap::new();

    for record in records
        .iter()
        .filter(|r| r.is_root() || rank_matches(r.rank, rank))
    {
        let tree_id = record.message_tree_id.as_str();
        if record.is_root() {
            if let Some(existing) = prompt_trees.insert(tree_id, record) {
                return Err(DataError::integrity(
                    tree_id,
                    format!(
                        "multiple root prompts ({} and {})",
                        existing.message_id, record.message_id
                    ),
                ));
            }
            prompts.push(record);
        } else if let Some(existing) = answers.insert(tree_id, record) {
            return Err(DataError::integrity(
                tree_id,
                format!(
                    "multiple answers at rank {} ({} and {})",
                    rank, existing.message_id, record.message_id
                ),
            ));
        }
    }

    let rows: Vec<PairRow> = prompts
        .into_iter()
        .filter_map(|prompt| {
            answers
                .get(prompt.message_tree_id.as_str())
                .map(|answer| PairRow {
                    tree_id: prompt.message_tree_id.clone(),
                    prompt_id: prompt.message_id.clone(),
                    prompt_text: prompt.text.clone(),
                    answer_id: answer.message_id.clone(),
                    answer_text: answer.text.clone(),
                })
        })
        .collect();

    tracing::debug!(rank, rows = rows.len(), "Built prompt/answer pairs");
    Ok(PairTable::new(rows))
}
