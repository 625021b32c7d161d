//! # Simulation Configuration
//!
//! Every tunable of the simulator lives here so the CLI and tests can build
//! a run from one value.
//!
//! ## Usage
//! ```rust
//! use tennis_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! assert_eq!(config.root_id, "0-0");
//! assert!(config.validate().is_ok());
//! ```

mod env;

pub use env::{from_env, from_file, CONFIG_PATH_ENV};

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Game/set/match thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Games a side needs before it can take the set (default: 6)
    pub games_to_win_set: u32,
    /// Lead in games required to take the set (default: 2)
    pub set_margin: u32,
    /// Game count that wins the set regardless of margin (default: 7).
    /// `None` plays an advantage set.
    pub tiebreak_at: Option<u32>,
    /// Sets needed to win the match (default: 2, best of three)
    pub sets_to_win: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self { games_to_win_set: 6, set_margin: 2, tiebreak_at: Some(7), sets_to_win: 2 }
    }
}

impl ScoringRules {
    /// Best of five with the standard set format.
    pub fn best_of_five() -> Self {
        Self { sets_to_win: 3, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.games_to_win_set == 0 {
            return Err(SimError::config("games_to_win_set must be at least 1"));
        }
        if self.set_margin == 0 {
            return Err(SimError::config("set_margin must be at least 1"));
        }
        if let Some(cap) = self.tiebreak_at {
            if cap <= self.games_to_win_set {
                return Err(SimError::config(format!(
                    "tiebreak_at ({}) must be greater than games_to_win_set ({})",
                    cap, self.games_to_win_set
                )));
            }
        }
        if self.sets_to_win == 0 {
            return Err(SimError::config("sets_to_win must be at least 1"));
        }
        Ok(())
    }
}

/// Full simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Id of the start state in the transition table
    pub root_id: String,
    pub rules: ScoringRules,
    /// When set, every node uses `probP = v` and `probQ = 1 - v` instead of
    /// its own table values.
    pub probability_override: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            root_id: "0-0".to_string(),
            rules: ScoringRules::default(),
            probability_override: None,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.root_id.trim().is_empty() {
            return Err(SimError::config("root_id must not be empty"));
        }
        if let Some(p) = self.probability_override {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::config(format!(
                    "probability_override must be within [0, 1], got {}",
                    p
                )));
            }
        }
        self.rules.validate()
    }
}
