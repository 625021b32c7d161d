//! CSV reading and writing for [`TransitionTable`]
//!
//! Expected columns (first row is a header and is skipped):
//! - 0: node id
//! - 1: probP
//! - 2: probQ
//! - 3: child id on a P point (empty = terminal)
//! - 4: child id on a Q point (empty = terminal)

use super::{NodeSpec, TransitionTable};
use crate::error::{Result, SimError};
use std::io;
use std::path::Path;

const COLUMNS: usize = 5;
const HEADER: [&str; COLUMNS] = ["id", "probP", "probQ", "nodeP", "nodeQ"];

impl TransitionTable {
    /// Load a table from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path.as_ref())?;
        Self::read_records(reader)
    }

    /// Load a table from any CSV source.
    pub fn from_csv_reader<R: io::Read>(source: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self::read_records(reader)
    }

    fn read_records<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut table = Self::new();

        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.len() != COLUMNS {
                return Err(SimError::config(format!(
                    "line {}: expected {} columns, found {}",
                    line,
                    COLUMNS,
                    record.len()
                )));
            }

            let id = &record[0];
            let prob_p = parse_probability(&record[1], "probP", id, line)?;
            let prob_q = parse_probability(&record[2], "probQ", id, line)?;

            table
                .insert(NodeSpec::new(id, prob_p, prob_q, Some(&record[3]), Some(&record[4])))
                .map_err(|e| match e {
                    SimError::Config(msg) => SimError::config(format!("line {}: {}", line, msg)),
                    other => other,
                })?;
        }

        tracing::debug!(rows = table.len(), "transition table loaded from CSV");
        Ok(table)
    }

    /// Write the table in the same CSV layout the loaders accept.
    pub fn write_csv<W: io::Write>(&self, sink: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(HEADER)?;
        for row in self.rows() {
            let prob_p = row.prob_p.to_string();
            let prob_q = row.prob_q.to_string();
            writer.write_record([
                row.id.as_str(),
                prob_p.as_str(),
                prob_q.as_str(),
                row.on_p.as_deref().unwrap_or(""),
                row.on_q.as_deref().unwrap_or(""),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_csv(file)
    }
}

fn parse_probability(raw: &str, field: &str, id: &str, line: u64) -> Result<f64> {
    if raw.is_empty() {
        return Err(SimError::config(format!(
            "line {}: empty {} for node '{}'",
            line, field, id
        )));
    }
    raw.parse::<f64>().map_err(|_| {
        SimError::config(format!(
            "line {}: invalid {} value '{}' for node '{}'",
            line, field, raw, id
        ))
    })
}
