pub mod hub_cache;

pub use hub_cache::{
    find_split_file, find_split_parquet_files, get_dataset_cache_dir, hub_cache_root,
    is_dataset_available, list_dataset_snapshots,
};
