//! # tennis_core - Markov Chain Tennis Match Simulation
//!
//! A tennis match is simulated as nested random processes: each game is a
//! seeded random walk over a DAG of score states, and games roll up into
//! sets and sets into a best-of-three match.
//!
//! ## Features
//! - Deterministic simulation (same seed = same match tree)
//! - Transition tables from CSV, JSON, or the generated standard game
//! - Point-by-point records with a stable JSON layout
//!
//! ## Example
//! ```rust
//! use tennis_core::{standard_game_table, GraphBuilder, MatchSimulator, SimConfig};
//!
//! let table = standard_game_table(0.6, 4).unwrap();
//! let graph = GraphBuilder::new(&table).build("0-0").unwrap();
//! let record = MatchSimulator::new(&graph, &SimConfig::default(), 42).unwrap().simulate().unwrap();
//! assert!(record.match_data.len() >= 2);
//! ```

#![allow(clippy::doc_lazy_continuation)]

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod models;
pub mod results;
pub mod table;

pub use analysis::BatchSummary;
pub use config::{ScoringRules, SimConfig};
pub use engine::{
    match_seed, seed_from_clock, simulate_batch, MatchSimulator, PointWalker,
    ProbabilityOverride, SeedSequence, SetSimulator, SimState,
};
pub use error::{Result, SimError};
pub use graph::{GraphBuilder, MarkovGraph, MarkovNode, NodeId, NodeKind};
pub use models::{GameRecord, MatchRecord, Outcome, PointRecord, Score, SetRecord, Side};
pub use results::{load_match, load_matches, ResultStore, SaveCursor};
pub use table::standard::standard_game_table;
pub use table::{NodeSpec, TransitionTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
