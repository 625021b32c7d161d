pub mod records;

pub use records::{
    GameRecord, MatchRecord, NodeRef, Outcome, PointRecord, Score, SetRecord, Side,
};
