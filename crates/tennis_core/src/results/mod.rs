//! Result persistence
//!
//! Records are written as pretty JSON under a root directory:
//!
//! ```text
//! <root>/matches/2026-10-19-14-03-59-0.json
//! <root>/sets/...
//! <root>/games/...
//! ```
//!
//! File indices are supplied by the caller. [`ResultStore::save_batch`]
//! returns the next free match index; [`ResultStore::save_records`] threads a
//! [`SaveCursor`] holding one index per record kind, so consecutive batches
//! never reuse a name.

use crate::error::Result;
use crate::models::{GameRecord, MatchRecord, SetRecord};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const MATCHES_DIR: &str = "matches";
pub const SETS_DIR: &str = "sets";
pub const GAMES_DIR: &str = "games";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// `<timestamp>-<index>.json`
pub fn record_file_name(at: DateTime<Utc>, index: u64) -> String {
    format!("{}-{}.json", at.format(TIMESTAMP_FORMAT), index)
}

/// Sort key of a `<timestamp>-<index>.json` name; `None` for other names.
fn parse_record_file_name(name: &str) -> Option<(String, u64)> {
    let stem = name.strip_suffix(".json")?;
    let (timestamp, index) = stem.rsplit_once('-')?;
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    Some((timestamp.to_string(), index.parse().ok()?))
}

/// Next free file index for each record kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveCursor {
    pub matches: u64,
    pub sets: u64,
    pub games: u64,
}

impl SaveCursor {
    /// Every kind starting at `index`.
    pub fn starting_at(index: u64) -> Self {
        Self { matches: index, sets: index, games: index }
    }
}

#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn matches_dir(&self) -> PathBuf {
        self.root.join(MATCHES_DIR)
    }

    pub fn save_match(&self, record: &MatchRecord, index: u64) -> Result<PathBuf> {
        self.save(MATCHES_DIR, record, index)
    }

    pub fn save_set(&self, record: &SetRecord, index: u64) -> Result<PathBuf> {
        self.save(SETS_DIR, record, index)
    }

    pub fn save_game(&self, record: &GameRecord, index: u64) -> Result<PathBuf> {
        self.save(GAMES_DIR, record, index)
    }

    /// Save every match starting at `start_index`; returns the next index.
    pub fn save_batch(&self, records: &[MatchRecord], start_index: u64) -> Result<u64> {
        let mut index = start_index;
        for record in records {
            self.save_match(record, index)?;
            index += 1;
        }
        tracing::debug!(count = records.len(), next_index = index, root = %self.root.display(), "batch saved");
        Ok(index)
    }

    /// Save matches, and with `include_children` every set and game too.
    /// Returns the cursor to pass to the next call.
    pub fn save_records(
        &self,
        records: &[MatchRecord],
        cursor: SaveCursor,
        include_children: bool,
    ) -> Result<SaveCursor> {
        let mut next = cursor;
        next.matches = self.save_batch(records, cursor.matches)?;
        if include_children {
            for set in records.iter().flat_map(|m| m.match_data.iter()) {
                self.save_set(set, next.sets)?;
                next.sets += 1;
                for game in &set.set_data {
                    self.save_game(game, next.games)?;
                    next.games += 1;
                }
            }
        }
        Ok(next)
    }

    fn save<T: Serialize>(&self, kind: &str, record: &T, index: u64) -> Result<PathBuf> {
        let dir = self.root.join(kind);
        fs::create_dir_all(&dir)?;
        let path = dir.join(record_file_name(Utc::now(), index));
        write_json(&path, record)?;
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn load_match<P: AsRef<Path>>(path: P) -> Result<MatchRecord> {
    read_json(path.as_ref())
}

/// Load every `*.json` match in `dir` in save order: by timestamp, then
/// numeric index. Names not written by [`ResultStore`] come last, by name.
pub fn load_matches<P: AsRef<Path>>(dir: P) -> Result<Vec<MatchRecord>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort_by_cached_key(|path| {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        (parse_record_file_name(&name).is_none(), parse_record_file_name(&name), name)
    });
    paths.iter().map(|p| load_match(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Outcome, Score, Side};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample_match(seed: u64) -> MatchRecord {
        let game = GameRecord { game_data: Vec::new(), game_result: Score::new(4, 0), game_winner: Side::P };
        let set = SetRecord {
            set_data: vec![game],
            set_result: Outcome { score: Score::new(6, 0), winner: Side::P },
        };
        MatchRecord {
            seed,
            match_data: vec![set.clone(), set],
            match_result: Outcome { score: Score::new(2, 0), winner: Side::P },
        }
    }

    #[test]
    fn test_file_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(record_file_name(at, 12), "2024-03-09-07-05-01-12.json");
    }

    #[test]
    fn test_save_and_load_match() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());
        let record = sample_match(42);

        let path = store.save_match(&record, 3).unwrap();
        assert!(path.starts_with(dir.path().join(MATCHES_DIR)));
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("-3.json"));
        assert_eq!(load_match(&path).unwrap(), record);
    }

    #[test]
    fn test_set_and_game_directories() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());
        let record = sample_match(1);

        let set_path = store.save_set(&record.match_data[0], 0).unwrap();
        let game_path = store.save_game(&record.match_data[0].set_data[0], 0).unwrap();
        assert!(set_path.starts_with(dir.path().join(SETS_DIR)));
        assert!(game_path.starts_with(dir.path().join(GAMES_DIR)));
    }

    #[test]
    fn test_batch_threads_index() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());
        let records: Vec<_> = (0..3).map(sample_match).collect();

        let next = store.save_batch(&records, 5).unwrap();
        assert_eq!(next, 8);

        let loaded = load_matches(store.matches_dir()).unwrap();
        assert_eq!(loaded.len(), 3);
        let mut seeds: Vec<u64> = loaded.iter().map(|m| m.seed).collect();
        seeds.sort();
        assert_eq!(seeds, vec![0, 1, 2]);
    }

    #[test]
    fn test_chained_batches_keep_every_record() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());
        let first: Vec<_> = (0..2).map(sample_match).collect();
        let second: Vec<_> = (2..5).map(sample_match).collect();

        let cursor = store.save_records(&first, SaveCursor::default(), true).unwrap();
        assert_eq!(cursor, SaveCursor { matches: 2, sets: 4, games: 4 });
        let cursor = store.save_records(&second, cursor, true).unwrap();
        assert_eq!(cursor, SaveCursor { matches: 5, sets: 10, games: 10 });

        let count = |sub: &str| fs::read_dir(dir.path().join(sub)).unwrap().count();
        assert_eq!(count(MATCHES_DIR), 5);
        assert_eq!(count(SETS_DIR), 10);
        assert_eq!(count(GAMES_DIR), 10);
    }

    #[test]
    fn test_load_matches_in_numeric_index_order() {
        let dir = TempDir::new().unwrap();
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap();
        let files = [(late, 0, 30), (early, 10, 20), (early, 2, 10), (early, 9, 15)];
        for (at, index, seed) in files {
            write_json(&dir.path().join(record_file_name(at, index)), &sample_match(seed)).unwrap();
        }
        write_json(&dir.path().join("000-manual.json"), &sample_match(99)).unwrap();

        let seeds: Vec<u64> = load_matches(dir.path()).unwrap().iter().map(|m| m.seed).collect();
        assert_eq!(seeds, vec![10, 15, 20, 30, 99]);
    }

    #[test]
    fn test_parse_record_file_name() {
        assert_eq!(
            parse_record_file_name("2024-03-09-07-05-01-12.json"),
            Some(("2024-03-09-07-05-01".to_string(), 12))
        );
        assert_eq!(parse_record_file_name("notes-3.json"), None);
        assert_eq!(parse_record_file_name("2024-03-09-07-05-01-x.json"), None);
    }

    #[test]
    fn test_load_matches_skips_other_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a record").unwrap();
        assert!(load_matches(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"seed\": 1").unwrap();
        assert!(matches!(load_match(&path), Err(crate::SimError::Json(_))));
    }
}
