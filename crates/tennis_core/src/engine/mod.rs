//! Simulation engine
//!
//! - [`walker`] plays the points of one game
//! - [`set_sim`] and [`match_sim`] apply the set and match scoring rules
//! - [`seed`] derives a distinct seed for every game

pub mod match_sim;
pub mod seed;
pub mod set_sim;
#[cfg(test)]
pub(crate) mod test_rng;
pub mod walker;

pub use match_sim::{match_outcome, simulate_batch, MatchSimulator};
pub use seed::{match_seed, seed_from_clock, SeedSequence};
pub use set_sim::{set_outcome, SetSimulator};
pub use walker::{PointWalker, ProbabilityOverride};

use crate::models::Side;

/// Progress of a set or match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Running,
    WonByP,
    WonByQ,
}

impl SimState {
    pub fn won_by(side: Side) -> Self {
        match side {
            Side::P => SimState::WonByP,
            Side::Q => SimState::WonByQ,
        }
    }

    pub fn is_finished(self) -> bool {
        self != SimState::Running
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            SimState::Running => None,
            SimState::WonByP => Some(Side::P),
            SimState::WonByQ => Some(Side::Q),
        }
    }
}
