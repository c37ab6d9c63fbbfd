//! JSONL export for derived tables

use super::error::DataError;
use super::record::RecordSet;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one JSON object per line, creating parent directories as needed.
pub fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::info!(rows = rows.len(), path = %path.display(), "Wrote JSONL");
    Ok(())
}

impl RecordSet {
    pub fn to_jsonl(&self, path: &Path) -> Result<(), DataError> {
        write_jsonl(path, self.records())
    }
}
