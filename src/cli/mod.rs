pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oasst_prep")]
#[command(about = "Build SFT and preference tables from conversation trees", long_about = None)]
struct Cli {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Default)]
pub struct DatasetArgs {
    /// JSON config file (flags below override it)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Dataset preset (oasst1, oasst2) or HuggingFace dataset name
    #[arg(long, global = true)]
    pub dataset: Option<String>,
    /// Split to load
    #[arg(long, global = true)]
    pub split: Option<String>,
    /// Directory holding JSONL exports
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
    /// Read from the HuggingFace hub cache instead of the data directory
    #[arg(long, global = true)]
    pub hub_cache: bool,
    /// Hub cache root; setting it here or as `paths.cache_dir` reads from the hub cache
    #[arg(long, global = true)]
    pub cache_dir: Option<String>,
    /// Language code to keep
    #[arg(long, global = true, conflicts_with = "all_langs")]
    pub lang: Option<String>,
    /// Keep records in every language
    #[arg(long, global = true)]
    pub all_langs: bool,
    /// Hide the file reading progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record, tree and rank statistics for a split
    Inspect {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count conversation roots
    Roots {
        /// Print every root message id
        #[arg(long)]
        list: bool,
    },
    /// Write roots and their direct replies as JSONL
    SingleStep {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write prompt/answer pairs at a rank as JSONL
    Pairs {
        /// Rank of the answer to pair with each prompt
        #[arg(long, default_value = "0")]
        rank: f64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write prompt/chosen/rejected rows as JSONL
    Preferences {
        /// Maximum number of conversation trees to sample
        #[arg(long)]
        max_trees: Option<usize>,
        /// Rank of the chosen answer
        #[arg(long)]
        rank_chosen: Option<f64>,
        /// Rank of the rejected answer
        #[arg(long)]
        rank_rejected: Option<f64>,
        /// Seed for tree sampling
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::build_config(&cli.dataset)?;

    match cli.command {
        Commands::Inspect { json } => commands::inspect(&config, &cli.dataset, json),
        Commands::Roots { list } => commands::roots(&config, &cli.dataset, list),
        Commands::SingleStep { output } => commands::single_step(&config, &cli.dataset, output),
        Commands::Pairs { rank, output } => commands::pairs(&config, &cli.dataset, rank, output),
        Commands::Preferences {
            max_trees,
            rank_chosen,
            rank_rejected,
            seed,
            output,
        } => {
            let mut config = config;
            if max_trees.is_some() {
                config.preference.max_trees = max_trees;
            }
            if let Some(rank) = rank_chosen {
                config.preference.rank_chosen = rank;
            }
            if let Some(rank) = rank_rejected {
                config.preference.rank_rejected = rank;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            config.validate()?;
            commands::preferences(&config, &cli.dataset, output)
        }
    }
}
