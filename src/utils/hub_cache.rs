//! Utility functions for locating datasets in the local HuggingFace hub cache
//!
//! This module provides common functionality for:
//! - Resolving the hub cache root
//! - Finding cached dataset snapshots
//! - Locating a split's parquet shards or JSONL export inside a snapshot

use std::path::{Path, PathBuf};

/// Returns the hub cache root: `override_dir` when given, otherwise
/// `$HOME/.cache/huggingface/hub`.
pub fn hub_cache_root(override_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = override_dir {
        return Some(dir.to_path_buf());
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".cache/huggingface/hub"))
}

/// Gets the cache directory for a dataset such as `OpenAssistant/oasst1`
///
/// # Returns
/// * `Option<PathBuf>` - `<root>/datasets--OpenAssistant--oasst1` if it exists
pub fn get_dataset_cache_dir(cache_root: &Path, dataset: &str) -> Option<PathBuf> {
    if !dataset.contains('/') {
        return None;
    }

    let cache_dir = cache_root.join(format!("datasets--{}", dataset.replace('/', "--")));
    if cache_dir.exists() {
        Some(cache_dir)
    } else {
        None
    }
}

/// Lists snapshot directories of a cached dataset, newest first
pub fn list_dataset_snapshots(cache_root: &Path, dataset: &str) -> Vec<PathBuf> {
    let Some(cache_dir) = get_dataset_cache_dir(cache_root, dataset) else {
        return Vec::new();
    };

    let Ok(entries) = std::fs::read_dir(cache_dir.join("snapshots")) else {
        return Vec::new();
    };

    let mut snapshots: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| e.file_type().ok().is_some_and(|ft| ft.is_dir()))
        .map(|e| e.path())
        .collect();

    // Sort by modification time (newest first)
    snapshots.sort_by(|a, b| {
        let a_time = a.metadata().ok().and_then(|m| m.modified().ok());
        let b_time = b.metadata().ok().and_then(|m| m.modified().ok());
        b_time.cmp(&a_time)
    });

    snapshots
}

/// Finds the JSONL file for `split` inside a snapshot directory.
///
/// Checks `<split>.jsonl` and `data/<split>.jsonl` first, then any `.jsonl`
/// file at those two levels whose name contains the split name.
pub fn find_split_file(snapshot: &Path, split: &str) -> Option<PathBuf> {
    let file_name = format!("{}.jsonl", split);
    let search_dirs = [snapshot.to_path_buf(), snapshot.join("data")];

    for dir in &search_dirs {
        let candidate = dir.join(&file_name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    for dir in &search_dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        let mut matches: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension().and_then(|s| s.to_str()) == Some("jsonl")
                    && p.file_name()
                        .and_then(|s| s.to_str())
                        .is_some_and(|name| name.contains(split))
            })
            .collect();
        matches.sort();
        if let Some(first) = matches.into_iter().next() {
            return Some(first);
        }
    }

    None
}

/// Finds the parquet shards of `split` inside a snapshot directory, sorted.
///
/// Hub snapshots store splits as `data/<split>-00000-of-00001-<hash>.parquet`;
/// a bare `<split>.parquet` is accepted too. Both the snapshot root and its
/// `data/` directory are searched.
pub fn find_split_parquet_files(snapshot: &Path, split: &str) -> Vec<PathBuf> {
    let shard_prefix = format!("{}-", split);
    let single_file = format!("{}.parquet", split);

    let mut shards: Vec<PathBuf> = [snapshot.to_path_buf(), snapshot.join("data")]
        .iter()
        .filter_map(|dir| std::fs::read_dir(dir).ok())
        .flat_map(|entries| entries.flatten().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension().and_then(|s| s.to_str()) == Some("parquet")
                && p.file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(|name| name.starts_with(&shard_prefix) || name == single_file)
        })
        .collect();

    shards.sort();
    shards
}

/// Checks if a dataset has at least one cached snapshot
pub fn is_dataset_available(cache_root: &Path, dataset: &str) -> bool {
    !list_dataset_snapshots(cache_root, dataset).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dataset_cache_dir_requires_owner() {
        let dir = TempDir::new().unwrap();
        assert!(get_dataset_cache_dir(dir.path(), "oasst1").is_none());
    }

    #[test]
    fn test_snapshot_and_split_resolution() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir
            .path()
            .join("datasets--OpenAssistant--oasst1/snapshots/abc123");
        std::fs::create_dir_all(snapshot.join("data")).unwrap();
        std::fs::write(snapshot.join("data/oasst1_validation.jsonl"), "").unwrap();

        assert!(is_dataset_available(dir.path(), "OpenAssistant/oasst1"));
        let snapshots = list_dataset_snapshots(dir.path(), "OpenAssistant/oasst1");
        assert_eq!(snapshots, vec![snapshot.clone()]);

        let found = find_split_file(&snapshot, "validation").unwrap();
        assert!(found.ends_with("data/oasst1_validation.jsonl"));
        assert!(find_split_file(&snapshot, "train").is_none());
    }

    #[test]
    fn test_parquet_shards_of_split() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        for name in [
            "train-00001-of-00002-b2.parquet",
            "train-00000-of-00002-a1.parquet",
            "validation-00000-of-00001-c3.parquet",
            "2023-04-12_oasst_ready.messages.jsonl.gz",
        ] {
            std::fs::write(data.join(name), "").unwrap();
        }

        let train = find_split_parquet_files(dir.path(), "train");
        assert_eq!(
            train,
            vec![
                data.join("train-00000-of-00002-a1.parquet"),
                data.join("train-00001-of-00002-b2.parquet"),
            ]
        );
        assert_eq!(find_split_parquet_files(dir.path(), "validation").len(), 1);
        assert!(find_split_parquet_files(dir.path(), "test").is_empty());
        // Messages dumps carry no split and are never picked up
        assert!(find_split_file(dir.path(), "train").is_none());
    }

    #[test]
    fn test_hub_cache_root_override() {
        let root = hub_cache_root(Some(Path::new("/tmp/hub"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/hub"));
    }
}
