pub mod error;
pub mod export;
pub mod loader;
pub mod pairs;
pub mod parquet_reader;
pub mod preference;
pub mod record;
pub mod tree;

pub use error::DataError;
pub use export::write_jsonl;
pub use loader::{
    lang_filter, load, load_dataset, read_records_jsonl, HubCacheSource, JsonlSource,
    RecordSource,
};
pub use parquet_reader::read_records_parquet;
pub use pairs::{build_pairs, rank_matches, PairRow, PairTable};
pub use preference::{
    build_preference_table, sample_tree_ids, PreferenceOptions, PreferenceRow, PreferenceTable,
};
pub use record::{Record, RecordSet};
pub use tree::{find_roots, select_single_step};
