//! Set state machine
//!
//! Plays games on one [`PointWalker`] until [`set_outcome`] names a winner.
//! The walker is reseeded from the match's [`SeedSequence`] before every
//! game.

use super::seed::SeedSequence;
use super::walker::PointWalker;
use super::SimState;
use crate::config::ScoringRules;
use crate::error::{Result, SimError};
use crate::models::{GameRecord, Outcome, Score, SetRecord, Side};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default bound on games in one set
pub const MAX_GAMES_PER_SET: u32 = 1000;

/// Winner of a set at `score`, if the set is over.
///
/// A side wins with at least `games_to_win_set` games and a lead of
/// `set_margin`, or on reaching `tiebreak_at` games.
pub fn set_outcome(rules: &ScoringRules, score: Score) -> Option<Side> {
    let leader = score.leader()?;
    let lead = score.get(leader);
    let trail = score.get(leader.opponent());

    if rules.tiebreak_at.is_some_and(|cap| lead >= cap) {
        return Some(leader);
    }
    (lead >= rules.games_to_win_set && lead - trail >= rules.set_margin).then_some(leader)
}

pub struct SetSimulator<'g, R = ChaCha8Rng> {
    walker: PointWalker<'g, R>,
    rules: ScoringRules,
    score: Score,
    games: Vec<GameRecord>,
    state: SimState,
    max_games: u32,
}

impl<'g, R: RngCore + SeedableRng> SetSimulator<'g, R> {
    pub fn new(walker: PointWalker<'g, R>, rules: ScoringRules) -> Self {
        Self {
            walker,
            rules,
            score: Score::default(),
            games: Vec::new(),
            state: SimState::Running,
            max_games: MAX_GAMES_PER_SET,
        }
    }

    /// Replace the [`MAX_GAMES_PER_SET`] bound.
    pub fn with_max_games(mut self, max_games: u32) -> Self {
        self.max_games = max_games;
        self
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Play one game with the next seed of `seeds` and apply it to the set.
    pub fn play_game(&mut self, seeds: &mut SeedSequence) -> Result<Side> {
        if self.state.is_finished() {
            return Err(SimError::invariant(format!(
                "game requested after the set ended {}",
                self.score
            )));
        }
        self.walker.reset(seeds.next_seed()?);
        let winner = self.walker.run()?;
        let record = self.walker.game_record()?;

        tracing::debug!(
            seed = self.walker.seed(),
            winner = %winner,
            points = record.game_data.len(),
            "game finished"
        );
        self.games.push(record);
        self.score.increment(winner);

        if let Some(set_winner) = set_outcome(&self.rules, self.score) {
            self.state = SimState::won_by(set_winner);
        }
        Ok(winner)
    }

    /// Play games until the set is decided.
    pub fn play(&mut self, seeds: &mut SeedSequence) -> Result<SetRecord> {
        while !self.state.is_finished() {
            if self.score.total() >= self.max_games {
                return Err(SimError::invariant(format!(
                    "set undecided after {} games ({})",
                    self.max_games, self.score
                )));
            }
            self.play_game(seeds)?;
        }
        self.record()
    }

    /// Record of the finished set.
    pub fn record(&self) -> Result<SetRecord> {
        let winner = self
            .state
            .winner()
            .ok_or_else(|| SimError::invariant("set record requested while running"))?;
        Ok(SetRecord {
            set_data: self.games.clone(),
            set_result: Outcome { score: self.score, winner },
        })
    }

    /// Clear the set for reuse. The walker is reseeded by the next game.
    pub fn reset(&mut self) {
        self.score = Score::default();
        self.games.clear();
        self.state = SimState::Running;
    }
}
