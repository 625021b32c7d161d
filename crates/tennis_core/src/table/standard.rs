//! Standard tennis game table
//!
//! Generates the score-state chain of one game with a constant point
//! probability. Deuce is unrolled `deuce_rounds` times so the chain stays a
//! DAG; the last deuce is played as a single deciding point. A point that
//! wins the game leads to an empty child id (the terminal leaf).
//!
//! ```text
//! 0-0 ─► 15-0 ─► ... ─► 40-30 ─► (game)
//!                  └──► deuce-1 ─► adv-p-1 ─► (game)
//!                          │           └──► deuce-2 ─► ...
//!                          └──► adv-q-1 ─► (game)
//! ```

use super::{NodeSpec, TransitionTable};
use crate::error::{Result, SimError};

const LABELS: [&str; 4] = ["0", "15", "30", "40"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameState {
    Regular(usize, usize),
    Deuce(u32),
    AdvP(u32),
    AdvQ(u32),
    WonP,
    WonQ,
}

impl GameState {
    /// Table id; `None` once the game is over.
    fn id(self) -> Option<String> {
        match self {
            GameState::Regular(p, q) => Some(format!("{}-{}", LABELS[p], LABELS[q])),
            GameState::Deuce(k) => Some(format!("deuce-{}", k)),
            GameState::AdvP(k) => Some(format!("adv-p-{}", k)),
            GameState::AdvQ(k) => Some(format!("adv-q-{}", k)),
            GameState::WonP | GameState::WonQ => None,
        }
    }

    /// Successors on a P point and on a Q point; `None` for terminals.
    fn successors(self, deuce_rounds: u32) -> Option<(GameState, GameState)> {
        match self {
            GameState::Regular(p, q) => {
                Some((regular_step(p + 1, q, true), regular_step(p, q + 1, false)))
            }
            GameState::Deuce(k) if k == deuce_rounds => Some((GameState::WonP, GameState::WonQ)),
            GameState::Deuce(k) => Some((GameState::AdvP(k), GameState::AdvQ(k))),
            GameState::AdvP(k) => Some((GameState::WonP, GameState::Deuce(k + 1))),
            GameState::AdvQ(k) => Some((GameState::Deuce(k + 1), GameState::WonQ)),
            GameState::WonP | GameState::WonQ => None,
        }
    }
}

fn regular_step(p: usize, q: usize, p_scored: bool) -> GameState {
    match (p, q) {
        (3, 3) => GameState::Deuce(1),
        (4, _) if p_scored => GameState::WonP,
        (_, 4) => GameState::WonQ,
        _ => GameState::Regular(p, q),
    }
}

/// Build the standard game table rooted at `"0-0"`.
///
/// # Arguments
/// * `prob_p` - probability that P wins any single point
/// * `deuce_rounds` - number of deuces played before the deciding point (>= 1)
pub fn standard_game_table(prob_p: f64, deuce_rounds: u32) -> Result<TransitionTable> {
    if !(0.0..=1.0).contains(&prob_p) {
        return Err(SimError::config(format!("prob_p must be within [0, 1], got {}", prob_p)));
    }
    if deuce_rounds == 0 {
        return Err(SimError::config("deuce_rounds must be at least 1"));
    }
    let prob_q = 1.0 - prob_p;

    let mut states = Vec::new();
    for p in 0..4 {
        for q in 0..4 {
            if (p, q) != (3, 3) {
                states.push(GameState::Regular(p, q));
            }
        }
    }
    for k in 1..=deuce_rounds {
        states.push(GameState::Deuce(k));
        if k < deuce_rounds {
            states.push(GameState::AdvP(k));
            states.push(GameState::AdvQ(k));
        }
    }

    let mut specs = Vec::with_capacity(states.len());
    for state in states {
        let (Some(id), Some((on_p, on_q))) = (state.id(), state.successors(deuce_rounds)) else {
            continue;
        };
        specs.push(NodeSpec::new(id, prob_p, prob_q, on_p.id().as_deref(), on_q.id().as_deref()));
    }
    TransitionTable::from_specs(specs)
}
