#![warn(missing_docs)]
//! Corlift CLI Library
//!
//! CLI infrastructure for the `corlift` binary: emit the warehouse query
//! templates for an experiment, or run a bootstrap analysis over an exported
//! set of receipt rows.
//!
//! # Example
//!
//! ```ignore
//! corlift sql receipts checkout_trust_badge --control off --treatment on
//! corlift analyze --input receipts.json --control off --treatment on --metric total
//! ```

mod analyze;
mod config;
mod input;

pub use analyze::{build_report, run_analysis};
pub use config::*;
pub use input::{load_receipts, parse_receipts};

use clap::{Args, Parser, Subcommand};
use corlift_warehouse::{experiment_receipts_sql, experiment_summary_sql, variant_stats_sql};
use std::path::PathBuf;

/// Corlift CLI arguments
#[derive(Parser, Debug)]
#[command(name = "corlift")]
#[command(author, version, about = "Corlift - A/B experiment financial-outcome analysis")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a warehouse query template
    Sql {
        /// Which template to print
        #[command(subcommand)]
        query: SqlCommand,
    },
    /// Bootstrap analysis over an exported set of receipt rows
    Analyze(AnalyzeArgs),
}

/// Query template selection
#[derive(Subcommand, Debug)]
pub enum SqlCommand {
    /// Experiment metadata and date-boundary lookup
    Summary {
        /// Experiment identifier (config flag)
        experiment_id: String,
    },
    /// Per-variant aggregate summary (bucketed units, GMS)
    Variants {
        /// Experiment identifier (config flag)
        experiment_id: String,
    },
    /// Per-receipt variant and financial detail
    Receipts {
        /// Experiment identifier (config flag)
        experiment_id: String,
        /// Control variant label
        #[arg(long)]
        control: String,
        /// Treatment variant label
        #[arg(long)]
        treatment: String,
    },
}

/// Arguments for the analyze subcommand
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON export of experiment receipts (array of row objects)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Control variant label
    #[arg(long)]
    pub control: String,

    /// Treatment variant label
    #[arg(long)]
    pub treatment: String,

    /// Metric to analyze: total, bad_recoupments, chargebacks
    #[arg(long, default_value = "total")]
    pub metric: String,

    /// Number of bootstrap iterations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Confidence level for intervals (e.g. 0.95)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Experiment id recorded in the report header
    #[arg(long)]
    pub experiment_id: Option<String>,
}

/// Run the corlift CLI. This is the main entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the corlift CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("corlift=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("corlift=info")
            .init();
    }

    // Discover corlift.toml configuration (CLI flags override)
    let config = CorliftConfig::discover().unwrap_or_default();

    match cli.command {
        Commands::Sql { query } => {
            println!("{}", render_sql(&query));
            Ok(())
        }
        Commands::Analyze(args) => analyze::run_analysis(&args, &config),
    }
}

fn render_sql(query: &SqlCommand) -> String {
    match query {
        SqlCommand::Summary { experiment_id } => experiment_summary_sql(experiment_id),
        SqlCommand::Variants { experiment_id } => variant_stats_sql(experiment_id),
        SqlCommand::Receipts {
            experiment_id,
            control,
            treatment,
        } => experiment_receipts_sql(experiment_id, control, treatment),
    }
}
