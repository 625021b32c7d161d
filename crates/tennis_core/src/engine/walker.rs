//! PointWalker - one game as a seeded random walk
//!
//! Starting at the root, every [`advance`](PointWalker::advance) draws a
//! uniform value and follows the P or Q edge of the current node until a
//! terminal node is reached. Each step is logged as a [`PointRecord`].
//!
//! The walker borrows the graph; [`reset`](PointWalker::reset) reseeds and
//! rewinds without touching it, so one walker serves every game of a match.

use crate::error::{Result, SimError};
use crate::graph::{MarkovGraph, NodeId};
use crate::models::{GameRecord, NodeRef, PointRecord, Score, Side};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Replaces every node's own point probabilities while active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityOverride {
    pub prob_p: f64,
    pub prob_q: f64,
}

impl ProbabilityOverride {
    /// Override with `probQ = 1 - probP`.
    pub fn from_p(prob_p: f64) -> Self {
        Self { prob_p, prob_q: 1.0 - prob_p }
    }
}

pub struct PointWalker<'g, R = ChaCha8Rng> {
    graph: &'g MarkovGraph,
    current: NodeId,
    rng: R,
    seed: u64,
    score: Score,
    log: Vec<PointRecord>,
    prob_override: Option<ProbabilityOverride>,
}

impl<'g> PointWalker<'g, ChaCha8Rng> {
    pub fn new(
        graph: &'g MarkovGraph,
        seed: u64,
        prob_override: Option<ProbabilityOverride>,
    ) -> Self {
        Self::with_rng(graph, seed, prob_override)
    }
}

impl<'g, R: RngCore + SeedableRng> PointWalker<'g, R> {
    /// Walker driven by a caller-chosen generator type.
    pub fn with_rng(
        graph: &'g MarkovGraph,
        seed: u64,
        prob_override: Option<ProbabilityOverride>,
    ) -> Self {
        Self {
            graph,
            current: graph.root(),
            rng: R::seed_from_u64(seed),
            seed,
            score: Score::default(),
            log: Vec::new(),
            prob_override,
        }
    }

    pub fn graph(&self) -> &'g MarkovGraph {
        self.graph
    }

    /// Seed of the game in progress
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn log(&self) -> &[PointRecord] {
        &self.log
    }

    pub fn is_finished(&self) -> bool {
        self.graph.node(self.current).is_terminal()
    }

    /// `probP` used at the current node
    pub fn effective_prob_p(&self) -> f64 {
        match self.prob_override {
            Some(o) => o.prob_p,
            None => self.graph.node(self.current).prob_p(),
        }
    }

    /// Play one point from the current node.
    pub fn advance(&mut self) -> Result<Side> {
        let node = self.graph.node(self.current);
        let Some((on_p, on_q)) = node.children() else {
            return Err(SimError::invariant(format!(
                "advance called on terminal node after {} points",
                self.score.total()
            )));
        };
        let self_node = node.id().map(str::to_string).ok_or_else(|| {
            SimError::invariant("non-terminal node without an id".to_string())
        })?;

        let prob_p = self.effective_prob_p();
        let value: f64 = self.rng.gen();
        let (scorer, next) = if value < prob_p { (Side::P, on_p) } else { (Side::Q, on_q) };

        self.score.increment(scorer);
        self.current = next;
        self.log.push(PointRecord {
            original_node: NodeRef {
                self_node,
                node_p: self.graph.name_of(on_p).map(str::to_string),
                node_q: self.graph.name_of(on_q).map(str::to_string),
            },
            result_value: value,
            partial_results: self.score.to_string(),
            scorer,
        });

        tracing::trace!(value, scorer = %scorer, score = %self.score, "point");
        Ok(scorer)
    }

    /// Play points until a terminal node is reached and return the winner.
    ///
    /// # Errors
    /// [`SimError::InvariantViolation`] if the walk outlasts the graph's
    /// longest path or ends on a tied tally.
    pub fn run(&mut self) -> Result<Side> {
        let limit = self.graph.longest_path();
        while !self.is_finished() {
            if self.log.len() >= limit {
                return Err(SimError::invariant(format!(
                    "game exceeded the longest path of {} points",
                    limit
                )));
            }
            self.advance()?;
        }
        self.winner()
    }

    /// Winner of a finished game.
    pub fn winner(&self) -> Result<Side> {
        if !self.is_finished() {
            return Err(SimError::invariant("game has not reached a terminal node"));
        }
        self.score.leader().ok_or_else(|| {
            SimError::invariant(format!(
                "game ended on a tied tally {} (seed {})",
                self.score, self.seed
            ))
        })
    }

    /// Record of the finished game.
    pub fn game_record(&self) -> Result<GameRecord> {
        let winner = self.winner()?;
        Ok(GameRecord {
            game_data: self.log.clone(),
            game_result: self.score,
            game_winner: winner,
        })
    }

    /// Reseed and rewind to the root for another game.
    pub fn reset(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
        self.seed = seed;
        self.current = self.graph.root();
        self.score = Score::default();
        self.log.clear();
    }
}
