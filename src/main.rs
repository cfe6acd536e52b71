use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use mofcap::data::loader::{load_table, load_tuple_series, parse_csv_text};
use mofcap::data::tuple::parse_tuple_text;
use mofcap::pipeline::{self, PreparedComparison, PreparedSeries};
use mofcap::{samples, PipelineConfig, ProjectedRow, RankOrder, ViewMode};

#[derive(Parser, Debug)]
#[command(name = "mofcap")]
#[command(author, version, about = "Prepare MOF carbon-capture chart data")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Pipeline config (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank existing and AI-designed structures and pair the top entries
    Compare {
        /// Existing-structure table (.csv, .json)
        #[arg(long, requires = "ai")]
        existing: Option<PathBuf>,

        /// AI-generated structure table (.csv, .json)
        #[arg(long, requires = "existing")]
        ai: Option<PathBuf>,

        /// Entries kept from each ranking
        #[arg(short, long)]
        top: Option<usize>,

        /// Ranking direction: desc (higher is better) or asc
        #[arg(long)]
        order: Option<Order>,

        /// Projection: existing, ai or comparison
        #[arg(short, long, default_value = "comparison")]
        mode: ViewMode,
    },

    /// Compare a table that already pairs values by name
    Paired {
        /// Paired table (.csv, .json); defaults to the carbon-capture sample
        #[arg(long)]
        file: Option<PathBuf>,

        /// Use the embedded ground-state-energy sample instead
        #[arg(long, conflicts_with = "file")]
        energy: bool,

        #[arg(short, long, default_value = "comparison")]
        mode: ViewMode,
    },

    /// Align two tuple-encoded convergence series
    Series {
        #[arg(long, requires = "ai")]
        existing: Option<PathBuf>,

        #[arg(long, requires = "existing")]
        ai: Option<PathBuf>,

        /// Maximum number of iteration points
        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(short, long, default_value = "comparison")]
        mode: ViewMode,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Order {
    Desc,
    Asc,
}

impl From<Order> for RankOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Desc => RankOrder::Descending,
            Order::Asc => RankOrder::Ascending,
        }
    }
}

#[derive(Serialize)]
struct Output<'a, T: Serialize> {
    mode: ViewMode,
    rows: Vec<ProjectedRow>,
    #[serde(flatten)]
    prepared: &'a T,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(args) {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    match args.command {
        Command::Compare {
            existing,
            ai,
            top,
            order,
            mode,
        } => {
            if let Some(top) = top {
                config.top_n = top;
            }
            if let Some(order) = order {
                config.order = order.into();
            }
            config.validate()?;

            let prepared = match (existing, ai) {
                (Some(existing), Some(ai)) => {
                    pipeline::compare_tables(&load_table(&existing)?, &load_table(&ai)?, &config)
                }
                _ => pipeline::compare_tables(
                    &parse_csv_text(samples::EXISTING_MOFS)?,
                    &parse_csv_text(samples::GENERATED_MOFS)?,
                    &config,
                ),
            };
            print_comparison(&prepared, mode)
        }
        Command::Paired { file, energy, mode } => {
            let rows = match file {
                Some(path) => load_table(&path)?,
                None if energy => parse_csv_text(samples::GROUND_STATE_ENERGY)?,
                None => parse_csv_text(samples::CARBON_CAPTURE)?,
            };
            let prepared = pipeline::paired_table(&rows, &config);
            print_comparison(&prepared, mode)
        }
        Command::Series {
            existing,
            ai,
            limit,
            mode,
        } => {
            if let Some(limit) = limit {
                config.iteration_limit = limit;
            }
            let prepared = match (existing, ai) {
                (Some(existing), Some(ai)) => pipeline::align_series(
                    load_series(&existing)?,
                    load_series(&ai)?,
                    &config,
                ),
                _ => pipeline::align_series(
                    parse_tuple_text(samples::VQE_EXISTING_SERIES),
                    parse_tuple_text(samples::VQE_GENERATED_SERIES),
                    &config,
                ),
            };
            print_series(&prepared, mode)
        }
    }
}

fn load_series(path: &Path) -> Result<mofcap::TupleParse> {
    let parsed = load_tuple_series(path)?;
    if parsed.is_empty_input() {
        bail!("{} contains no series lines", path.display());
    }
    Ok(parsed)
}

fn print_comparison(prepared: &PreparedComparison, mode: ViewMode) -> Result<()> {
    let mut chart = prepared.clone().into_chart();
    chart.set_mode(mode);
    print_json(&Output {
        mode,
        rows: chart.rows(),
        prepared,
    })
}

fn print_series(prepared: &PreparedSeries, mode: ViewMode) -> Result<()> {
    let mut chart = prepared.clone().into_chart();
    chart.set_mode(mode);
    print_json(&Output {
        mode,
        rows: chart.rows(),
        prepared,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{json}");
    Ok(())
}
