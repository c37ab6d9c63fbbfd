//! Preference and SFT data preparation from conversation trees
//!
//! This crate turns the flat message exports of human-annotated conversation
//! trees (OpenAssistant oasst1/oasst2) into tables for supervised fine-tuning
//! and preference-based training.
//!
//! ## Pipeline
//!
//! - `data::loader`: fetch a split and narrow it with a predicate
//! - `data::tree`: find conversation roots and single-step conversations
//! - `data::pairs`: join roots with the reply at a given rank
//! - `data::preference`: join two rank tables into chosen/rejected rows
//!
//! ## Supporting modules
//!
//! - `config`: configuration management
//! - `metrics`: split statistics
//! - `utils`: HuggingFace hub cache lookup

pub mod config;
pub mod data;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use data::{
    build_pairs, build_preference_table, find_roots, select_single_step, DataError,
    PreferenceOptions, Record, RecordSet,
};

/// Library errors
pub use anyhow::{Error, Result};
