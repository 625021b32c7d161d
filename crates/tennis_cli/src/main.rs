//! tennis-sim CLI
//!
//! Markov chain tennis simulation: run matches, check transition tables,
//! generate the standard game table, summarize saved results.

mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tennis_core::{
    config, load_matches, seed_from_clock, simulate_batch, standard_game_table, BatchSummary,
    GraphBuilder, ResultStore, SaveCursor, SimConfig, TransitionTable,
};

#[derive(Parser)]
#[command(name = "tennis-sim")]
#[command(version, about = "Markov chain tennis match simulator", long_about = None)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate matches over a transition table
    Simulate {
        /// Transition table file
        #[arg(long)]
        table: PathBuf,

        /// Table format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<TableFormat>,

        /// Batch seed (default: wall clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of matches
        #[arg(long, default_value_t = 1)]
        matches: usize,

        /// Use this probP (and 1 - probP) at every node
        #[arg(long)]
        override_prob: Option<f64>,

        /// JSON config file (default: $TENNIS_SIM_CONFIG_PATH)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory to save match records in
        #[arg(long)]
        out: Option<PathBuf>,

        /// Index of the first saved match file
        #[arg(long, default_value_t = 0)]
        start_index: u64,

        /// Index of the first saved set file (default: --start-index)
        #[arg(long)]
        start_set_index: Option<u64>,

        /// Index of the first saved game file (default: --start-index)
        #[arg(long)]
        start_game_index: Option<u64>,

        /// Also save every set and game record
        #[arg(long, default_value = "false")]
        save_all: bool,
    },

    /// Build the graph of a table and report its shape
    Validate {
        #[arg(long)]
        table: PathBuf,

        #[arg(long, value_enum)]
        format: Option<TableFormat>,

        /// Start state id
        #[arg(long, default_value = "0-0")]
        root: String,
    },

    /// Write the standard game table as CSV
    Generate {
        /// Probability that P wins a point
        #[arg(long)]
        prob_p: f64,

        /// Deuces played before the deciding point
        #[arg(long, default_value_t = 4)]
        deuce_rounds: u32,

        #[arg(long)]
        out: PathBuf,
    },

    /// Print statistics over saved match records
    Summarize {
        /// Result directory (or its matches/ subdirectory)
        #[arg(long)]
        results: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    fn detect(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(TableFormat::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(TableFormat::Json),
            _ => bail!("cannot infer table format of {}; pass --format", path.display()),
        }
    }
}

fn load_table(path: &Path, format: Option<TableFormat>) -> Result<TransitionTable> {
    let format = match format {
        Some(f) => f,
        None => TableFormat::detect(path)?,
    };
    let table = match format {
        TableFormat::Csv => TransitionTable::from_csv_path(path),
        TableFormat::Json => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            TransitionTable::from_json_str(&json)
        }
    };
    table.with_context(|| format!("loading transition table {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let loaded = match path {
        Some(path) => Some(
            config::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
        ),
        None => config::from_env().context("loading config from environment")?,
    };
    Ok(loaded.unwrap_or_default())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Simulate {
            table,
            format,
            seed,
            matches,
            override_prob,
            config,
            out,
            start_index,
            start_set_index,
            start_game_index,
            save_all,
        } => {
            let mut sim_config = load_config(config.as_deref())?;
            if override_prob.is_some() {
                sim_config.probability_override = override_prob;
            }
            sim_config.validate().context("invalid simulation config")?;

            let batch_seed = seed.unwrap_or_else(seed_from_clock);
            println!("🎾 Simulating {} match(es)", matches);
            println!("   Table: {}", table.display());
            println!("   Seed:  {}", batch_seed);

            let table = load_table(&table, format)?;
            let graph = GraphBuilder::new(&table)
                .build(&sim_config.root_id)
                .context("building score graph")?;
            let records = simulate_batch(&graph, &sim_config, batch_seed, matches)?;

            for record in &records {
                println!(
                    "   seed {:>20}  winner {}  sets {}",
                    record.seed,
                    record.winner(),
                    record.match_result.score
                );
            }
            println!("\n{}", BatchSummary::from_matches(&records));

            if let Some(dir) = out {
                let cursor = SaveCursor {
                    matches: start_index,
                    sets: start_set_index.unwrap_or(start_index),
                    games: start_game_index.unwrap_or(start_index),
                };
                let next = ResultStore::new(&dir)
                    .save_records(&records, cursor, save_all)
                    .with_context(|| format!("saving results to {}", dir.display()))?;
                println!("✅ Saved to {}", dir.display());
                println!(
                    "   Next indices: --start-index {} --start-set-index {} --start-game-index {}",
                    next.matches, next.sets, next.games
                );
            }
        }

        Commands::Validate { table, format, root } => {
            let loaded = load_table(&table, format)?;
            let graph = GraphBuilder::new(&loaded).build(&root).with_context(|| {
                format!("building graph of {} from '{}'", table.display(), root)
            })?;

            println!("✅ {} is a valid score graph", table.display());
            println!("   Rows:         {}", loaded.len());
            println!("   Nodes:        {}", graph.len());
            println!("   Longest game: {} points", graph.longest_path());
        }

        Commands::Generate { prob_p, deuce_rounds, out } => {
            let table = standard_game_table(prob_p, deuce_rounds)?;
            table
                .write_csv_path(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("✅ Wrote {} rows to {}", table.len(), out.display());
        }

        Commands::Summarize { results } => {
            let dir = if results.join(tennis_core::results::MATCHES_DIR).is_dir() {
                results.join(tennis_core::results::MATCHES_DIR)
            } else {
                results
            };
            let records = load_matches(&dir)
                .with_context(|| format!("loading match records from {}", dir.display()))?;
            if records.is_empty() {
                bail!("no match records found in {}", dir.display());
            }
            println!("{}", BatchSummary::from_matches(&records));
        }
    }

    Ok(())
}
