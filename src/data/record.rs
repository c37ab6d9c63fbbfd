//! Flat conversation-tree records
//!
//! A conversation tree is never materialized as a graph. Each record carries a
//! parent pointer and the id of the tree it belongs to; roots have no parent.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One message in a conversation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub message_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub message_tree_id: String,
    pub text: String,
    /// Lower is better. Exports store it as a float, so integral ranks may
    /// arrive as `0.0`, `1.0`, ...
    #[serde(default)]
    pub rank: Option<f64>,
    #[serde(default)]
    pub lang: String,
}

impl Record {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Ordered collection of records. Order carries no meaning for the pipeline,
/// but every transformation preserves it so output is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns a new set holding only the records matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> RecordSet
    where
        F: Fn(&Record) -> bool,
    {
        self.records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    pub fn message_ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.message_id.as_str()).collect()
    }

    pub fn parent_ids(&self) -> Vec<Option<&str>> {
        self.records.iter().map(|r| r.parent_id.as_deref()).collect()
    }

    pub fn tree_ids(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.message_tree_id.as_str())
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.text.as_str()).collect()
    }

    /// Distinct tree ids in order of first appearance
    pub fn distinct_tree_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.message_tree_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Groups records by tree id; records keep their relative order
    pub fn index_by_tree(&self) -> HashMap<&str, Vec<&Record>> {
        let mut index: HashMap<&str, Vec<&Record>> = HashMap::new();
        for record in &self.records {
            index
                .entry(record.message_tree_id.as_str())
                .or_default()
                .push(record);
        }
        index
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
