//! Loading conversation-tree splits from local exports

use super::error::DataError;
use super::record::{Record, RecordSet};
use crate::config::DatasetConfig;
use super::parquet_reader::read_records_parquet;
use crate::utils::hub_cache::{
    find_split_file, find_split_parquet_files, hub_cache_root, list_dataset_snapshots,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Supplies the records of a (dataset, split) pair
pub trait RecordSource {
    fn fetch(&self, dataset: &str, split: &str) -> Result<RecordSet, DataError>;
}

/// Reads flat JSONL message exports from a local directory.
///
/// For split `S` of dataset `owner/name` the first existing file among
/// `<dir>/S.jsonl`, `<dir>/name_S.jsonl` and `<dir>/name/S.jsonl` is read.
#[derive(Debug, Clone)]
pub struct JsonlSource {
    dir: PathBuf,
    show_progress: bool,
}

impl JsonlSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn candidate_files(&self, dataset: &str, split: &str) -> Vec<PathBuf> {
        let short_name = dataset.rsplit('/').next().unwrap_or(dataset);
        vec![
            self.dir.join(format!("{}.jsonl", split)),
            self.dir.join(format!("{}_{}.jsonl", short_name, split)),
            self.dir.join(short_name).join(format!("{}.jsonl", split)),
        ]
    }
}

impl RecordSource for JsonlSource {
    fn fetch(&self, dataset: &str, split: &str) -> Result<RecordSet, DataError> {
        let candidates = self.candidate_files(dataset, split);
        let path = candidates.iter().find(|p| p.is_file()).ok_or_else(|| {
            DataError::retrieval(
                dataset,
                split,
                format!(
                    "no JSONL export found, looked for: {}",
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
        })?;

        read_records_jsonl(path, self.show_progress)
            .map_err(|e| DataError::retrieval(dataset, split, format!("{}: {}", path.display(), e)))
    }
}

/// Reads a dataset that was already downloaded into the HuggingFace hub
/// cache. Snapshots are tried newest first; within a snapshot the split's
/// parquet shards are preferred over a JSONL export.
#[derive(Debug, Clone, Default)]
pub struct HubCacheSource {
    cache_root: Option<PathBuf>,
    show_progress: bool,
}

impl HubCacheSource {
    /// `cache_root` overrides the default `$HOME/.cache/huggingface/hub`
    pub fn new(cache_root: Option<PathBuf>) -> Self {
        Self {
            cache_root,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Records of `split` in one snapshot: all parquet shards concatenated,
    /// else a JSONL export. `None` when the snapshot holds neither.
    fn read_snapshot(
        &self,
        snapshot: &Path,
        dataset: &str,
        split: &str,
    ) -> Option<Result<RecordSet, DataError>> {
        let shards = find_split_parquet_files(snapshot, split);
        if !shards.is_empty() {
            let mut records = Vec::new();
            for shard in &shards {
                tracing::info!(path = %shard.display(), "Reading cached parquet shard");
                match read_records_parquet(shard, self.show_progress) {
                    Ok(set) => records.extend(set),
                    Err(e) => {
                        return Some(Err(DataError::retrieval(
                            dataset,
                            split,
                            format!("{}: {}", shard.display(), e),
                        )))
                    }
                }
            }
            return Some(Ok(RecordSet::new(records)));
        }

        let path = find_split_file(snapshot, split)?;
        tracing::info!(path = %path.display(), "Reading cached JSONL export");
        Some(
            read_records_jsonl(&path, self.show_progress).map_err(|e| {
                DataError::retrieval(dataset, split, format!("{}: {}", path.display(), e))
            }),
        )
    }
}

impl RecordSource for HubCacheSource {
    fn fetch(&self, dataset: &str, split: &str) -> Result<RecordSet, DataError> {
        let root = hub_cache_root(self.cache_root.as_deref()).ok_or_else(|| {
            DataError::retrieval(dataset, split, "cannot determine hub cache directory")
        })?;

        let snapshots = list_dataset_snapshots(&root, dataset);
        if snapshots.is_empty() {
            return Err(DataError::retrieval(
                dataset,
                split,
                format!(
                    "not found in hub cache {}. Download it first with: huggingface-cli download --repo-type dataset {}",
                    root.display(),
                    dataset
                ),
            ));
        }

        snapshots
            .iter()
            .find_map(|snapshot| self.read_snapshot(snapshot, dataset, split))
            .unwrap_or_else(|| {
                Err(DataError::retrieval(
                    dataset,
                    split,
                    format!(
                        "no parquet shards or JSONL export for this split in {} cached snapshot(s) under {}",
                        snapshots.len(),
                        root.display()
                    ),
                ))
            })
    }
}

/// Fetches `split` of `dataset` and keeps only records matching `filter`.
/// Without a filter the split is returned unchanged.
pub fn load<S: RecordSource + ?Sized>(
    source: &S,
    dataset: &str,
    split: &str,
    filter: Option<&dyn Fn(&Record) -> bool>,
) -> Result<RecordSet, DataError> {
    let records = source.fetch(dataset, split)?;
    let fetched = records.len();

    let records = match filter {
        Some(predicate) => records.filter(predicate),
        None => records,
    };

    tracing::info!(
        dataset,
        split,
        fetched,
        kept = records.len(),
        "Loaded conversation records"
    );
    Ok(records)
}

/// Loads the split named by `config`, applying its language filter if set
pub fn load_dataset<S: RecordSource + ?Sized>(
    source: &S,
    config: &DatasetConfig,
) -> Result<RecordSet, DataError> {
    match &config.lang {
        Some(lang) => {
            let filter = lang_filter(lang.clone());
            let filter: &dyn Fn(&Record) -> bool = &filter;
            load(source, &config.name, &config.split, Some(filter))
        }
        None => load(source, &config.name, &config.split, None),
    }
}

/// Predicate keeping records whose language code equals `lang`
pub fn lang_filter(lang: impl Into<String>) -> impl Fn(&Record) -> bool {
    let lang = lang.into();
    move |record| record.lang == lang
}

/// Bar over `total` units, or a hidden one when progress is off
pub(crate) fn progress_bar(total: u64, show_progress: bool, template: &str) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

/// Reads records from a flat JSONL export.
///
/// Blank lines are ignored. Lines that are not valid UTF-8 or do not parse as
/// a record are skipped and counted in a single warning.
pub fn read_records_jsonl(path: &Path, show_progress: bool) -> std::io::Result<RecordSet> {
    let file = File::open(path)?;
    let total_bytes = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let pb = progress_bar(
        total_bytes,
        show_progress,
        "[{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} {msg}",
    );

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        line_no += 1;
        pb.inc(n as u64);

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::debug!(line = line_no, error = %e, "Skipping line that is not UTF-8");
                skipped += 1;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Record>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!(line = line_no, error = %e, "Skipping unparseable line");
                skipped += 1;
            }
        }
    }

    pb.finish_and_clear();

    if skipped > 0 {
        tracing::warn!(
            skipped,
            path = %path.display(),
            "Skipped lines that are not conversation records"
        );
    }

    Ok(RecordSet::new(records))
}
