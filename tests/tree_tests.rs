use oasst_prep_rs::data::{find_roots, select_single_step, Record, RecordSet};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn record(id: &str, parent: Option<&str>, tree: &str) -> Record {
    Record {
        message_id: id.to_string(),
        parent_id: parent.map(str::to_string),
        message_tree_id: tree.to_string(),
        text: format!("text of {}", id),
        rank: None,
        lang: "en".to_string(),
    }
}

#[test]
fn test_find_roots_three_levels() {
    let records = RecordSet::new(vec![
        record("R1", None, "T1"),
        record("C1", Some("R1"), "T1"),
        record("G1", Some("C1"), "T1"),
    ]);

    let roots = find_roots(&records);
    assert_eq!(roots, HashSet::from(["R1".to_string()]));
}

#[test]
fn test_select_single_step_drops_grandchildren() {
    let records = RecordSet::new(vec![
        record("R1", None, "T1"),
        record("C1", Some("R1"), "T1"),
        record("G1", Some("C1"), "T1"),
    ]);

    let selected = select_single_step(&records);
    assert_eq!(selected.message_ids(), vec!["R1", "C1"]);
}

#[test]
fn test_select_single_step_drops_dangling_parents() {
    // C2's parent was filtered out upstream
    let records = RecordSet::new(vec![
        record("R1", None, "T1"),
        record("C1", Some("R1"), "T1"),
        record("C2", Some("R2"), "T2"),
    ]);

    let selected = select_single_step(&records);
    assert_eq!(selected.message_ids(), vec!["R1", "C1"]);
}

#[test]
fn test_empty_input() {
    let records = RecordSet::default();
    assert!(find_roots(&records).is_empty());
    assert!(select_single_step(&records).is_empty());
}

#[test]
fn test_multiple_trees() {
    let records = RecordSet::new(vec![
        record("R1", None, "T1"),
        record("R2", None, "T2"),
        record("C1", Some("R1"), "T1"),
        record("C2", Some("R2"), "T2"),
        record("C3", Some("R2"), "T2"),
        record("G3", Some("C3"), "T2"),
    ]);

    assert_eq!(find_roots(&records).len(), 2);
    let selected = select_single_step(&records);
    assert_eq!(selected.len(), 5);
    assert!(!selected.message_ids().contains(&"G3"));
}

/// Random forests: `parents[i]` picks the parent of message `i` among earlier
/// messages, or none.
fn arb_records() -> impl Strategy<Value = RecordSet> {
    prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 0..40).prop_map(
        |parents| {
            let mut records: Vec<Record> = Vec::with_capacity(parents.len());
            for (i, parent) in parents.into_iter().enumerate() {
                let id = format!("m{}", i);
                let rec = match parent {
                    Some(idx) if i > 0 => {
                        let parent = &records[idx.index(i)];
                        record(&id, Some(parent.message_id.as_str()), &parent.message_tree_id)
                    }
                    _ => record(&id, None, &format!("t{}", i)),
                };
                records.push(rec);
            }
            RecordSet::new(records)
        },
    )
}

/// Number of parent hops from `id` up to a parentless message, or `None` when
/// the chain reaches a parent that is not in `records`.
fn depth(records: &RecordSet, id: &str) -> Option<usize> {
    let parent_of: HashMap<&str, Option<&str>> = records
        .iter()
        .map(|r| (r.message_id.as_str(), r.parent_id.as_deref()))
        .collect();

    let mut current = id;
    let mut hops = 0;
    loop {
        match *parent_of.get(current)? {
            None => return Some(hops),
            Some(parent) => {
                hops += 1;
                if hops > records.len() {
                    return None;
                }
                current = parent;
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_roots_are_exactly_parentless(records in arb_records()) {
        let roots = find_roots(&records);
        let expected: HashSet<String> = records
            .iter()
            .filter(|r| r.parent_id.is_none())
            .map(|r| r.message_id.clone())
            .collect();
        prop_assert_eq!(roots, expected);
    }

    #[test]
    fn prop_single_step_is_depth_one(
        records in arb_records(),
        dropped in prop::collection::vec(any::<bool>(), 40),
    ) {
        // Dropping messages leaves replies whose parent is absent from the set
        let records: RecordSet = records
            .into_iter()
            .zip(dropped)
            .filter(|(_, drop)| !drop)
            .map(|(r, _)| r)
            .collect();

        let selected = select_single_step(&records);
        let selected_ids: HashSet<&str> = selected.message_ids().into_iter().collect();

        for r in &selected {
            let d = depth(&records, &r.message_id);
            prop_assert!(
                matches!(d, Some(0) | Some(1)),
                "record {} has depth {:?}",
                r.message_id,
                d
            );
        }
        for r in &records {
            if matches!(depth(&records, &r.message_id), Some(0) | Some(1)) {
                prop_assert!(
                    selected_ids.contains(r.message_id.as_str()),
                    "record {} is within one level but was dropped",
                    r.message_id
                );
            }
        }
        prop_assert_eq!(selected_ids.len(), selected.len());
    }
}
