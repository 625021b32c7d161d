//! Batch statistics over match records

use crate::models::{MatchRecord, Score, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Mean and standard deviation of one quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub mean: f64,
    pub std_dev: f64,
}

impl Spread {
    pub fn of(values: &[f64]) -> Option<Self> {
        Some(Self { mean: mean(values)?, std_dev: std_dev(values)? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub matches: usize,
    pub match_wins: Score,
    pub set_wins: Score,
    pub game_wins: Score,
    pub point_wins: Score,
    /// Matches won without dropping a set
    pub straight_sets: usize,
    pub points_per_game: Option<Spread>,
    pub games_per_set: Option<Spread>,
}

impl BatchSummary {
    pub fn from_matches(records: &[MatchRecord]) -> Self {
        let mut match_wins = Score::default();
        let mut set_wins = Score::default();
        let mut game_wins = Score::default();
        let mut point_wins = Score::default();
        let mut straight_sets = 0;
        let mut points_per_game = Vec::new();
        let mut games_per_set = Vec::new();

        for record in records {
            match_wins.increment(record.winner());
            if record.match_result.score.get(record.winner().opponent()) == 0 {
                straight_sets += 1;
            }
            for set in &record.match_data {
                set_wins.increment(set.winner());
                games_per_set.push(set.set_data.len() as f64);
                for game in &set.set_data {
                    game_wins.increment(game.game_winner);
                    points_per_game.push(game.game_data.len() as f64);
                    for point in &game.game_data {
                        point_wins.increment(point.scorer);
                    }
                }
            }
        }

        Self {
            matches: records.len(),
            match_wins,
            set_wins,
            game_wins,
            point_wins,
            straight_sets,
            points_per_game: Spread::of(&points_per_game),
            games_per_set: Spread::of(&games_per_set),
        }
    }

    /// Share of matches won by `side`; `None` for an empty batch.
    pub fn win_rate(&self, side: Side) -> Option<f64> {
        (self.matches > 0).then(|| f64::from(self.match_wins.get(side)) / self.matches as f64)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Matches:        {}", self.matches)?;
        writeln!(f, "Match wins:     p {} / q {}", self.match_wins.p, self.match_wins.q)?;
        writeln!(f, "Straight sets:  {}", self.straight_sets)?;
        writeln!(f, "Set wins:       p {} / q {}", self.set_wins.p, self.set_wins.q)?;
        writeln!(f, "Game wins:      p {} / q {}", self.game_wins.p, self.game_wins.q)?;
        writeln!(f, "Point wins:     p {} / q {}", self.point_wins.p, self.point_wins.q)?;
        if let Some(s) = self.points_per_game {
            writeln!(f, "Points/game:    {:.2} (sd {:.2})", s.mean, s.std_dev)?;
        }
        if let Some(s) = self.games_per_set {
            writeln!(f, "Games/set:      {:.2} (sd {:.2})", s.mean, s.std_dev)?;
        }
        Ok(())
    }
}
