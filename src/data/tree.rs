//! Root finding and single-step conversation selection

use super::record::RecordSet;
use std::collections::HashSet;

/// Message ids of every record without a parent, i.e. the prompts that
/// start a conversation.
pub fn find_roots(records: &RecordSet) -> HashSet<String> {
    records
        .iter()
        .filter(|r| r.is_root())
        .map(|r| r.message_id.clone())
        .collect()
}

/// Keeps only conversation roots and their direct replies.
///
/// Deeper replies are dropped, and so is any reply whose parent is not a root
/// of `records` (including parents filtered out upstream).
pub fn select_single_step(records: &RecordSet) -> RecordSet {
    let roots = find_roots(records);
    let selected = records.filter(|r| {
        roots.contains(&r.message_id)
            || r.parent_id
                .as_ref()
                .is_some_and(|parent| roots.contains(parent))
    });

    tracing::debug!(
        roots = roots.len(),
        kept = selected.len(),
        dropped = records.len() - selected.len(),
        "Selected single-step conversations"
    );

    selected
}
