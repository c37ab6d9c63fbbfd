//! CLI command implementations

use super::DatasetArgs;
use anyhow::{Context, Result};
use oasst_prep_rs::config::dataset::AVAILABLE_DATASETS;
use oasst_prep_rs::config::{Config, DatasetConfig};
use oasst_prep_rs::data::{
    build_pairs, build_preference_table, find_roots, load_dataset, select_single_step,
    HubCacheSource, JsonlSource, PreferenceOptions, RecordSet, RecordSource,
};
use oasst_prep_rs::metrics::compute_dataset_stats;
use std::path::PathBuf;

/// Merges the config file (if any) with command line overrides
pub fn build_config(args: &DatasetArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(dataset) = &args.dataset {
        config.dataset.name = if AVAILABLE_DATASETS.contains_key(dataset) {
            DatasetConfig::from_preset(dataset)?.name
        } else {
            dataset.clone()
        };
    }
    if let Some(split) = &args.split {
        config.dataset.split = split.clone();
    }
    if let Some(lang) = &args.lang {
        config.dataset.lang = Some(lang.clone());
    }
    if args.all_langs {
        config.dataset.lang = None;
    }
    if let Some(dir) = &args.data_dir {
        config.paths.data_dir = dir.clone();
    }
    if let Some(dir) = &args.cache_dir {
        config.paths.cache_dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Hub cache when asked for or when a cache root is configured (flag or file),
/// flat JSONL exports under `data_dir` otherwise
fn record_source(config: &Config, args: &DatasetArgs) -> Box<dyn RecordSource> {
    let show_progress = !args.no_progress;
    if args.hub_cache || config.paths.cache_dir.is_some() {
        Box::new(
            HubCacheSource::new(config.paths.cache_dir.as_ref().map(PathBuf::from))
                .with_progress(show_progress),
        )
    } else {
        Box::new(JsonlSource::new(&config.paths.data_dir).with_progress(show_progress))
    }
}

fn load_records(config: &Config, args: &DatasetArgs) -> Result<RecordSet> {
    let source = record_source(config, args);
    let records = load_dataset(source.as_ref(), &config.dataset).with_context(|| {
        format!(
            "Failed to load {} ({})",
            config.dataset.name, config.dataset.split
        )
    })?;
    Ok(records)
}

fn describe_filter(config: &Config) -> String {
    match &config.dataset.lang {
        Some(lang) => format!("lang={}", lang),
        None => "all languages".to_string(),
    }
}

pub fn inspect(config: &Config, args: &DatasetArgs, as_json: bool) -> Result<()> {
    let records = load_records(config, args)?;
    let stats = compute_dataset_stats(&records);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!(
        "{} [{}] ({})",
        config.dataset.name,
        config.dataset.split,
        describe_filter(config)
    );
    println!("─────────────────────────────────────────────");
    for key in ["total_records", "trees", "roots", "direct_replies", "preference_trees"] {
        if let Some(value) = stats.get(key) {
            println!("  {:<18} {}", key, value);
        }
    }

    if let Some(info) = stats.get("info").and_then(|v| v.as_array()) {
        println!();
        for line in info.iter().filter_map(|v| v.as_str()) {
            println!("  {}", line);
        }
    }

    if let Some(warnings) = stats.get("warnings").and_then(|v| v.as_array()) {
        for warning in warnings.iter().filter_map(|v| v.as_str()) {
            println!("  ⚠️  {}", warning);
        }
    }

    println!();
    Ok(())
}

pub fn roots(config: &Config, args: &DatasetArgs, list: bool) -> Result<()> {
    let records = load_records(config, args)?;
    let roots = find_roots(&records);

    if list {
        let mut ids: Vec<_> = roots.iter().collect();
        ids.sort();
        for id in ids {
            println!("{}", id);
        }
    } else {
        println!(
            "{} conversation roots in {} records ({})",
            roots.len(),
            records.len(),
            describe_filter(config)
        );
    }

    Ok(())
}

pub fn single_step(config: &Config, args: &DatasetArgs, output: Option<PathBuf>) -> Result<()> {
    let records = load_records(config, args)?;
    let selected = select_single_step(&records);

    let output = output.unwrap_or_else(|| config.paths.single_step_file());
    selected
        .to_jsonl(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ Wrote {} of {} records to {}",
        selected.len(),
        records.len(),
        output.display()
    );
    Ok(())
}

pub fn pairs(config: &Config, args: &DatasetArgs, rank: f64, output: Option<PathBuf>) -> Result<()> {
    let records = load_records(config, args)?;
    let selected = select_single_step(&records);
    let table = build_pairs(&selected, rank)?;

    let output = output.unwrap_or_else(|| config.paths.pairs_file(rank));
    table
        .to_jsonl(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ Wrote {} prompt/answer pairs at rank {} to {}",
        table.len(),
        rank,
        output.display()
    );
    Ok(())
}

pub fn preferences(config: &Config, args: &DatasetArgs, output: Option<PathBuf>) -> Result<()> {
    let records = load_records(config, args)?;
    let selected = select_single_step(&records);
    let options = PreferenceOptions::from_config(config);
    let table = build_preference_table(&selected, &options)?;

    let output = output.unwrap_or_else(|| config.paths.preference_file());
    table
        .to_jsonl(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ Wrote {} preference rows (chosen rank {}, rejected rank {}) to {}",
        table.len(),
        options.rank_chosen,
        options.rank_rejected,
        output.display()
    );
    if table.is_empty() {
        println!("⚠️  No tree had answers at both ranks. Try `oasst_prep inspect`.");
    }
    Ok(())
}
