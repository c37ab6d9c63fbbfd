//! Summary statistics for a loaded conversation-tree split
//!
//! Used to sanity-check a split before building pair or preference tables.

use crate::data::{find_roots, rank_matches, RecordSet};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Compute record, tree and rank statistics for `records`
pub fn compute_dataset_stats(records: &RecordSet) -> HashMap<String, serde_json::Value> {
    use serde_json::json;

    let roots = find_roots(records);
    let message_ids: HashSet<&str> = records.message_ids().into_iter().collect();
    let tree_count = records.distinct_tree_ids().len();

    let mut direct_replies = 0usize;
    let mut deeper_replies = 0usize;
    let mut dangling = 0usize;
    let mut langs: BTreeMap<&str, usize> = BTreeMap::new();
    let mut ranks: BTreeMap<String, usize> = BTreeMap::new();
    let mut trees_with_rank0: HashSet<&str> = HashSet::new();
    let mut trees_with_rank1: HashSet<&str> = HashSet::new();

    for record in records {
        *langs.entry(record.lang.as_str()).or_default() += 1;

        let Some(parent) = record.parent_id.as_deref() else {
            continue;
        };

        if roots.contains(parent) {
            direct_replies += 1;
            let rank_key = match record.rank {
                Some(r) => format!("{}", r),
                None => "unranked".to_string(),
            };
            *ranks.entry(rank_key).or_default() += 1;

            let tree = record.message_tree_id.as_str();
            if rank_matches(record.rank, 0.0) {
                trees_with_rank0.insert(tree);
            }
            if rank_matches(record.rank, 1.0) {
                trees_with_rank1.insert(tree);
            }
        } else if message_ids.contains(parent) {
            deeper_replies += 1;
        } else {
            dangling += 1;
        }
    }

    let preference_trees = trees_with_rank0.intersection(&trees_with_rank1).count();
    let total = records.len();

    let mut warnings = Vec::new();
    let mut info = Vec::new();

    info.push(format!(
        "Direct replies: {} ({:.1}%)",
        direct_replies,
        percent(direct_replies, total)
    ));
    info.push(format!(
        "Deeper replies (dropped by single-step selection): {} ({:.1}%)",
        deeper_replies,
        percent(deeper_replies, total)
    ));
    info.push(format!(
        "Trees with rank 0 and rank 1 replies: {} of {}",
        preference_trees, tree_count
    ));

    if total == 0 {
        warnings.push("Split is empty. Check the dataset name, split and language filter.".to_string());
    } else if preference_trees == 0 {
        warnings.push(
            "No tree has both a rank 0 and a rank 1 direct reply; preference tables will be empty."
                .to_string(),
        );
    }

    if dangling > 0 {
        warnings.push(format!(
            "{} replies reference a parent outside this split (likely removed by the language filter).",
            dangling
        ));
    }

    if roots.len() != tree_count {
        warnings.push(format!(
            "Found {} roots for {} trees; some trees have no root or several roots.",
            roots.len(),
            tree_count
        ));
    }

    let mut stats = HashMap::new();
    stats.insert("total_records".to_string(), json!(total));
    stats.insert("trees".to_string(), json!(tree_count));
    stats.insert("roots".to_string(), json!(roots.len()));
    stats.insert("direct_replies".to_string(), json!(direct_replies));
    stats.insert("deeper_replies".to_string(), json!(deeper_replies));
    stats.insert("dangling_replies".to_string(), json!(dangling));
    stats.insert("preference_trees".to_string(), json!(preference_trees));
    stats.insert("languages".to_string(), json!(langs));
    stats.insert("reply_ranks".to_string(), json!(ranks));
    stats.insert("warnings".to_string(), json!(warnings));
    stats.insert("info".to_string(), json!(info));

    stats
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}
