//! Reading message records from the parquet shards of a hub snapshot

use super::loader::progress_bar;
use super::record::{Record, RecordSet};
use parquet::errors::Result as ParquetResult;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row};
use std::fs::File;
use std::path::Path;

/// Reads every row of a parquet shard as a [`Record`].
///
/// Columns are matched by name, so extra columns (`role`, `review_count`, ...)
/// and column order do not matter. Rows missing one of the id or text columns
/// are skipped and counted in a single warning.
pub fn read_records_parquet(path: &Path, show_progress: bool) -> ParquetResult<RecordSet> {
    let reader = SerializedFileReader::new(File::open(path)?)?;
    let num_rows = reader.metadata().file_metadata().num_rows().max(0) as u64;

    let pb = progress_bar(
        num_rows,
        show_progress,
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rows {msg}",
    );

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.get_row_iter(None)? {
        let row = row?;
        pb.inc(1);
        match record_from_row(&row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    pb.finish_and_clear();

    if skipped > 0 {
        tracing::warn!(
            skipped,
            path = %path.display(),
            "Skipped rows without message ids or text"
        );
    }

    Ok(RecordSet::new(records))
}

fn record_from_row(row: &Row) -> Option<Record> {
    let mut message_id = None;
    let mut parent_id = None;
    let mut message_tree_id = None;
    let mut text = None;
    let mut rank = None;
    let mut lang = None;

    for (name, field) in row.get_column_iter() {
        match name.as_str() {
            "message_id" => message_id = field_string(field),
            "parent_id" => parent_id = field_string(field),
            "message_tree_id" => message_tree_id = field_string(field),
            "text" => text = field_string(field),
            "rank" => rank = field_f64(field),
            "lang" => lang = field_string(field),
            _ => {}
        }
    }

    Some(Record {
        message_id: message_id?,
        parent_id,
        message_tree_id: message_tree_id?,
        text: text?,
        rank,
        lang: lang.unwrap_or_default(),
    })
}

fn field_string(field: &Field) -> Option<String> {
    match field {
        Field::Str(s) => Some(s.clone()),
        _ => None,
    }
}

fn field_f64(field: &Field) -> Option<f64> {
    match field {
        Field::Double(v) => Some(*v),
        Field::Float(v) => Some(f64::from(*v)),
        Field::Int(v) => Some(f64::from(*v)),
        Field::Long(v) => Some(*v as f64),
        _ => None,
    }
}
