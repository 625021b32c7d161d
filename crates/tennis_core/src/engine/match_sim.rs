//! Match state machine and batch runner

use super::seed::{match_seed, SeedSequence};
use super::set_sim::SetSimulator;
use super::walker::{PointWalker, ProbabilityOverride};
use super::SimState;
use crate::config::{ScoringRules, SimConfig};
use crate::error::{Result, SimError};
use crate::graph::MarkovGraph;
use crate::models::{MatchRecord, Outcome, Score, SetRecord, Side};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Winner of a match at set score `sets`, if the match is over.
pub fn match_outcome(rules: &ScoringRules, sets: Score) -> Option<Side> {
    let leader = sets.leader()?;
    (sets.get(leader) >= rules.sets_to_win).then_some(leader)
}

/// Plays whole matches over one graph.
///
/// ```text
/// MatchSimulator ─► SetSimulator ─► PointWalker ─► &MarkovGraph
///       └── SeedSequence (one seed per game)
/// ```
pub struct MatchSimulator<'g, R = ChaCha8Rng> {
    set: SetSimulator<'g, R>,
    seeds: SeedSequence,
    seed: u64,
    score: Score,
    sets: Vec<SetRecord>,
    state: SimState,
}

impl<'g> MatchSimulator<'g, ChaCha8Rng> {
    /// Simulator for a match seeded with `seed`.
    ///
    /// # Errors
    /// [`SimError::Config`] if `config` does not validate.
    pub fn new(graph: &'g MarkovGraph, config: &SimConfig, seed: u64) -> Result<Self> {
        Self::with_rng(graph, config, seed)
    }
}

impl<'g, R: RngCore + SeedableRng> MatchSimulator<'g, R> {
    pub fn with_rng(graph: &'g MarkovGraph, config: &SimConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let prob_override = config.probability_override.map(ProbabilityOverride::from_p);
        let walker = PointWalker::with_rng(graph, seed, prob_override);
        Ok(Self {
            set: SetSimulator::new(walker, config.rules.clone()),
            seeds: SeedSequence::new(seed),
            seed,
            score: Score::default(),
            sets: Vec::new(),
            state: SimState::Running,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Sets won so far
    pub fn score(&self) -> Score {
        self.score
    }

    pub fn sets(&self) -> &[SetRecord] {
        &self.sets
    }

    /// Play one set and apply it to the match.
    pub fn play_set(&mut self) -> Result<Side> {
        if self.state.is_finished() {
            return Err(SimError::invariant(format!(
                "set requested after match {} ended",
                self.seed
            )));
        }
        let record = self.set.play(&mut self.seeds)?;
        let winner = record.winner();

        tracing::debug!(
            seed = self.seed,
            winner = %winner,
            games_p = record.set_result.score.p,
            games_q = record.set_result.score.q,
            "set finished"
        );
        self.sets.push(record);
        self.score.increment(winner);
        self.set.reset();

        if let Some(match_winner) = match_outcome(self.set.rules(), self.score) {
            self.state = SimState::won_by(match_winner);
        }
        Ok(winner)
    }

    /// Play the match to completion.
    pub fn simulate(&mut self) -> Result<MatchRecord> {
        while !self.state.is_finished() {
            self.play_set()?;
        }
        let record = self.record()?;
        tracing::info!(
            seed = self.seed,
            winner = %record.winner(),
            sets_p = self.score.p,
            sets_q = self.score.q,
            "match finished"
        );
        Ok(record)
    }

    /// Record of the finished match.
    pub fn record(&self) -> Result<MatchRecord> {
        let winner = self
            .state
            .winner()
            .ok_or_else(|| SimError::invariant("match record requested while running"))?;
        Ok(MatchRecord {
            seed: self.seed,
            match_data: self.sets.clone(),
            match_result: Outcome { score: self.score, winner },
        })
    }

    /// Prepare for another match over the same graph.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.seeds.reset(seed);
        self.score = Score::default();
        self.sets.clear();
        self.state = SimState::Running;
        self.set.reset();
    }
}

/// Simulate `count` matches, match `i` seeded with `match_seed(batch_seed, i)`.
pub fn simulate_batch(
    graph: &MarkovGraph,
    config: &SimConfig,
    batch_seed: u64,
    count: usize,
) -> Result<Vec<MatchRecord>> {
    let mut sim = MatchSimulator::new(graph, config, match_seed(batch_seed, 0))?;
    let mut records = Vec::with_capacity(count);

    for i in 0..count as u64 {
        sim.reset(match_seed(batch_seed, i));
        records.push(sim.simulate()?);
    }

    let p_wins = records.iter().filter(|m| m.winner() == Side::P).count();
    tracing::info!(batch_seed, count, p_wins, q_wins = count - p_wins, "batch finished");
    Ok(records)
}
