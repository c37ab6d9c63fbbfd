//! Chosen/rejected preference tables for DPO-style training
//!
//! Built from two pair tables over the same records, one at the chosen rank
//! and one at the rejected rank, joined on the tree id. Trees missing either
//! answer are dropped.

use super::error::DataError;
use super::export::write_jsonl;
use super::pairs::build_pairs;
use super::record::RecordSet;
use crate::config::Config;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Knobs for [`build_preference_table`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceOptions {
    /// Upper bound on the number of conversation trees used. `None` uses all.
    pub max_trees: Option<usize>,
    pub rank_chosen: f64,
    pub rank_rejected: f64,
    /// Seed for tree sampling. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for PreferenceOptions {
    fn default() -> Self {
        Self {
            max_trees: None,
            rank_chosen: 0.0,
            rank_rejected: 1.0,
            seed: None,
        }
    }
}

impl PreferenceOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_trees: config.preference.max_trees,
            rank_chosen: config.preference.rank_chosen,
            rank_rejected: config.preference.rank_rejected,
            seed: config.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRow {
    pub tree_id: String,
    pub prompt: String,
    pub chosen: String,
    pub rejected: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceTable {
    rows: Vec<PreferenceRow>,
}

impl PreferenceTable {
    pub fn new(rows: Vec<PreferenceRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PreferenceRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PreferenceRow> {
        self.rows.iter()
    }

    pub fn to_jsonl(&self, path: &Path) -> Result<(), DataError> {
        write_jsonl(path, &self.rows)
    }
}

/// Picks the trees to use: all of them, or a uniform sample without
/// replacement of exactly `max_trees` when fewer than the distinct count.
pub fn sample_tree_ids<'a>(
    records: &'a RecordSet,
    max_trees: Option<usize>,
    seed: Option<u64>,
) -> Result<HashSet<&'a str>, DataError> {
    let tree_ids = records.distinct_tree_ids();

    match max_trees {
        Some(0) => Err(DataError::InvalidArgument(
            "max_trees must be > 0".to_string(),
        )),
        Some(n) if n < tree_ids.len() => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let sampled: HashSet<&str> = tree_ids.choose_multiple(&mut rng, n).copied().collect();
            tracing::info!(
                sampled = sampled.len(),
                available = tree_ids.len(),
                "Sampled conversation trees"
            );
            Ok(sampled)
        }
        _ => Ok(tree_ids.into_iter().collect()),
    }
}

/// Builds (prompt, chosen, rejected) rows from single-step conversations.
///
/// `records` is expected to contain roots and their direct replies only (see
/// [`crate::data::select_single_step`]); deeper replies sharing a rank with a
/// direct reply are reported as a data-integrity error by the pair builder.
/// Equal chosen and rejected ranks are allowed and yield identical answers.
pub fn build_preference_table(
    records: &RecordSet,
    options: &PreferenceOptions,
) -> Result<PreferenceTable, DataError> {
    let selected = sample_tree_ids(records, options.max_trees, options.seed)?;
    let used = records.filter(|r| selected.contains(r.message_tree_id.as_str()));

    let chosen = build_pairs(&used, options.rank_chosen)?;
    let rejected = build_pairs(&used, options.rank_rejected)?;
    let rejected_by_tree = rejected.by_tree();

    let rows: Vec<PreferenceRow> = chosen
        .iter()
        .filter_map(|c| {
            rejected_by_tree
                .get(c.tree_id.as_str())
                .map(|r| PreferenceRow {
                    tree_id: c.tree_id.clone(),
                    prompt: c.prompt_text.clone(),
                    chosen: c.answer_text.clone(),
                    rejected: r.answer_text.clone(),
                })
        })
        .collect();

    tracing::info!(
        trees = selected.len(),
        chosen = chosen.len(),
        rejected = rejected.len(),
        rows = rows.len(),
        "Built preference table"
    );

    Ok(PreferenceTable::new(rows))
}
