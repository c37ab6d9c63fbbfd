use oasst_prep_rs::data::{
    build_preference_table, DataError, PreferenceOptions, Record, RecordSet,
};
use std::collections::HashSet;

fn prompt(id: &str, tree: &str, text: &str) -> Record {
    Record {
        message_id: id.to_string(),
        parent_id: None,
        message_tree_id: tree.to_string(),
        text: text.to_string(),
        rank: None,
        lang: "en".to_string(),
    }
}

fn answer(id: &str, parent: &str, tree: &str, rank: f64, text: &str) -> Record {
    Record {
        message_id: id.to_string(),
        parent_id: Some(parent.to_string()),
        message_tree_id: tree.to_string(),
        text: text.to_string(),
        rank: Some(rank),
        lang: "en".to_string(),
    }
}

fn tree_t1() -> Vec<Record> {
    vec![
        prompt("P1", "T1", "What is 2+2?"),
        answer("A1a", "P1", "T1", 0.0, "4"),
        answer("A1b", "P1", "T1", 1.0, "I don't know"),
    ]
}

/// `n` complete trees, each with rank 0 and rank 1 answers
fn complete_trees(n: usize) -> RecordSet {
    (0..n)
        .flat_map(|i| {
            let tree = format!("T{}", i);
            let p = format!("P{}", i);
            vec![
                prompt(&p, &tree, &format!("question {}", i)),
                answer(&format!("A{}a", i), &p, &tree, 0.0, "good"),
                answer(&format!("A{}b", i), &p, &tree, 1.0, "bad"),
            ]
        })
        .collect()
}

#[test]
fn test_single_tree_example() {
    let records = RecordSet::new(tree_t1());
    let table = build_preference_table(&records, &PreferenceOptions::default()).unwrap();

    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.prompt, "What is 2+2?");
    assert_eq!(row.chosen, "4");
    assert_eq!(row.rejected, "I don't know");
}

#[test]
fn test_tree_missing_rejected_is_dropped() {
    let mut records = tree_t1();
    records.push(prompt("P2", "T2", "Capital of France?"));
    records.push(answer("A2a", "P2", "T2", 0.0, "Paris"));

    let table =
        build_preference_table(&RecordSet::new(records), &PreferenceOptions::default()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].tree_id, "T1");
}

#[test]
fn test_tree_missing_chosen_is_dropped() {
    let records = RecordSet::new(vec![
        prompt("P3", "T3", "q"),
        answer("A3b", "P3", "T3", 1.0, "only rejected"),
    ]);
    let table = build_preference_table(&records, &PreferenceOptions::default()).unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_custom_ranks() {
    let mut records = tree_t1();
    records.push(answer("A1c", "P1", "T1", 2.0, "Five"));

    let options = PreferenceOptions {
        rank_chosen: 1.0,
        rank_rejected: 2.0,
        ..Default::default()
    };
    let table = build_preference_table(&RecordSet::new(records), &options).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].chosen, "I don't know");
    assert_eq!(table.rows()[0].rejected, "Five");
}

#[test]
fn test_equal_ranks_are_degenerate_but_valid() {
    let options = PreferenceOptions {
        rank_chosen: 0.0,
        rank_rejected: 0.0,
        ..Default::default()
    };
    let table = build_preference_table(&RecordSet::new(tree_t1()), &options).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].chosen, table.rows()[0].rejected);
}

#[test]
fn test_max_trees_zero_rejected() {
    let options = PreferenceOptions {
        max_trees: Some(0),
        ..Default::default()
    };
    let err = build_preference_table(&complete_trees(3), &options).unwrap_err();
    assert!(matches!(err, DataError::InvalidArgument(_)));
}

#[test]
fn test_max_trees_samples_exactly() {
    let records = complete_trees(10);
    let options = PreferenceOptions {
        max_trees: Some(4),
        seed: Some(42),
        ..Default::default()
    };

    let table = build_preference_table(&records, &options).unwrap();
    assert_eq!(table.len(), 4);

    let trees: HashSet<&str> = table.iter().map(|r| r.tree_id.as_str()).collect();
    assert_eq!(trees.len(), 4);
}

#[test]
fn test_seeded_sampling_is_reproducible() {
    let records = complete_trees(25);
    let options = PreferenceOptions {
        max_trees: Some(7),
        seed: Some(1234),
        ..Default::default()
    };

    let a = build_preference_table(&records, &options).unwrap();
    let b = build_preference_table(&records, &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_max_trees_above_count_uses_all() {
    let records = complete_trees(5);
    let options = PreferenceOptions {
        max_trees: Some(50),
        ..Default::default()
    };

    let sampled = build_preference_table(&records, &options).unwrap();
    let full = build_preference_table(&records, &PreferenceOptions::default()).unwrap();
    assert_eq!(sampled.len(), 5);
    assert_eq!(sampled, full);
}

#[test]
fn test_rows_never_missing_answers() {
    let mut records = complete_trees(6).into_records();
    records.push(prompt("PX", "TX", "lonely prompt"));
    records.push(answer("AX", "PX", "TX", 1.0, "rejected only"));

    let table =
        build_preference_table(&RecordSet::new(records), &PreferenceOptions::default()).unwrap();
    assert_eq!(table.len(), 6);
    for row in table.iter() {
        assert!(!row.chosen.is_empty());
        assert!(!row.rejected.is_empty());
    }
}

#[test]
fn test_preference_export_jsonl() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("preferences.jsonl");

    let table =
        build_preference_table(&RecordSet::new(tree_t1()), &PreferenceOptions::default()).unwrap();
    table.to_jsonl(&path).unwrap();

    let line = std::fs::read_to_string(&path).unwrap();
    let row: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(row["prompt"], "What is 2+2?");
    assert_eq!(row["chosen"], "4");
    assert_eq!(row["rejected"], "I don't know");
}
