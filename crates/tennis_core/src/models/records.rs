//! Result Record Data Structures
//!
//! Output of the simulation engine, consumed by analysis and plotting tools.
//! Field names and nesting are a wire contract:
//!
//! ```text
//! Match  = { seed, matchData: [Set], matchResult: { score: {p, q}, winner } }
//! Set    = { setData: [Game], setResult: { score: {p, q}, winner } }
//! Game   = { gameData: [Point], gameResult: {p, q}, gameWinner }
//! Point  = { originalNode: {selfNode, nodeP, nodeQ}, resultValue, partialResults: "P-Q", scorer }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    P,
    Q,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::P => "p",
            Side::Q => "q",
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::P => Side::Q,
            Side::Q => Side::P,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-side counter (points, games or sets depending on the level)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Score {
    pub p: u32,
    pub q: u32,
}

impl Score {
    pub fn new(p: u32, q: u32) -> Self {
        Self { p, q }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::P => self.p,
            Side::Q => self.q,
        }
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::P => self.p += 1,
            Side::Q => self.q += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.p + self.q
    }

    /// Side with the strictly higher count
    pub fn leader(&self) -> Option<Side> {
        match self.p.cmp(&self.q) {
            std::cmp::Ordering::Greater => Some(Side::P),
            std::cmp::Ordering::Less => Some(Side::Q),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.p, self.q)
    }
}

/// Final score and winner of a set or match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Outcome {
    pub score: Score,
    pub winner: Side,
}

/// Identity of the node a point was played from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    pub self_node: String,
    /// `None` when the P branch ends the game
    pub node_p: Option<String>,
    /// `None` when the Q branch ends the game
    pub node_q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    pub original_node: NodeRef,
    /// Uniform draw in `[0, 1)` that decided the point
    pub result_value: f64,
    /// Cumulative score after this point, `"P-Q"`
    pub partial_results: String,
    pub scorer: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_data: Vec<PointRecord>,
    pub game_result: Score,
    pub game_winner: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    pub set_data: Vec<GameRecord>,
    pub set_result: Outcome,
}

impl SetRecord {
    pub fn winner(&self) -> Side {
        self.set_result.winner
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Seed the whole match was derived from; replaying it reproduces the record.
    pub seed: u64,
    pub match_data: Vec<SetRecord>,
    pub match_result: Outcome,
}

impl MatchRecord {
    pub fn winner(&self) -> Side {
        self.match_result.winner
    }

    pub fn games(&self) -> impl Iterator<Item = &GameRecord> {
        self.match_data.iter().flat_map(|set| set.set_data.iter())
    }

    pub fn points(&self) -> impl Iterator<Item = &PointRecord> {
        self.games().flat_map(|game| game.game_data.iter())
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_game() -> GameRecord {
        GameRecord {
            game_data: vec![PointRecord {
                original_node: NodeRef {
                    self_node: "0-0".to_string(),
                    node_p: None,
                    node_q: Some("0-15".to_string()),
                },
                result_value: 0.25,
                partial_results: "1-0".to_string(),
                scorer: Side::P,
            }],
            game_result: Score::new(1, 0),
            game_winner: Side::P,
        }
    }

    #[test]
    fn test_game_field_names() {
        let value = serde_json::to_value(sample_game()).unwrap();
        assert_eq!(
            value,
            json!({
                "gameData": [{
                    "originalNode": {"selfNode": "0-0", "nodeP": null, "nodeQ": "0-15"},
                    "resultValue": 0.25,
                    "partialResults": "1-0",
                    "scorer": "p"
                }],
                "gameResult": {"p": 1, "q": 0},
                "gameWinner": "p"
            })
        );
    }

    #[test]
    fn test_match_field_names() {
        let record = MatchRecord {
            seed: 42,
            match_data: vec![SetRecord {
                set_data: vec![sample_game()],
                set_result: Outcome { score: Score::new(6, 0), winner: Side::P },
            }],
            match_result: Outcome { score: Score::new(2, 0), winner: Side::P },
        };
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["seed"], 42);
        assert_eq!(value["matchResult"], json!({"score": {"p": 2, "q": 0}, "winner": "p"}));
        assert_eq!(value["matchData"][0]["setResult"]["score"]["p"], 6);
        assert!(value["matchData"][0]["setData"][0]["gameData"].is_array());

        let parsed: MatchRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_score_helpers() {
        let mut score = Score::default();
        score.increment(Side::Q);
        score.increment(Side::Q);
        score.increment(Side::P);

        assert_eq!(score.get(Side::Q), 2);
        assert_eq!(score.total(), 3);
        assert_eq!(score.leader(), Some(Side::Q));
        assert_eq!(score.to_string(), "1-2");
        assert_eq!(Score::new(3, 3).leader(), None);
        assert_eq!(Side::P.opponent(), Side::Q);
    }
}
