//! Transition Table
//!
//! Tabular node specifications consumed by [`GraphBuilder`](crate::graph::GraphBuilder).
//!
//! Each row carries: node id, `probP`, `probQ`, child id on a P point and
//! child id on a Q point. An empty child id means "terminal".
//!
//! Sources:
//! - CSV with a header row (see [`TransitionTable::from_csv_path`])
//! - JSON mapping `{ id: {probP, probQ, nodeP, nodeQ} }`
//! - the generated standard game table in [`standard`]

mod csv_loader;
pub mod standard;

use crate::error::{Result, SimError};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One row of the transition table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(rename = "probP")]
    pub prob_p: f64,
    #[serde(rename = "probQ")]
    pub prob_q: f64,
    #[serde(rename = "nodeP")]
    pub on_p: Option<String>,
    #[serde(rename = "nodeQ")]
    pub on_q: Option<String>,
}

impl NodeSpec {
    /// Build a row, normalizing blank child ids to `None`.
    pub fn new(
        id: impl Into<String>,
        prob_p: f64,
        prob_q: f64,
        on_p: Option<&str>,
        on_q: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            prob_p,
            prob_q,
            on_p: normalize_child(on_p),
            on_q: normalize_child(on_q),
        }
    }

    /// Row with no children.
    pub fn terminal(id: impl Into<String>, prob_p: f64, prob_q: f64) -> Self {
        Self::new(id, prob_p, prob_q, None, None)
    }
}

fn normalize_child(child: Option<&str>) -> Option<String> {
    child.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string)
}

/// Row body of the JSON mapping form (the id is the map key)
#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(rename = "probP", default)]
    prob_p: Option<serde_json::Value>,
    #[serde(rename = "probQ", default)]
    prob_q: Option<serde_json::Value>,
    #[serde(rename = "nodeP", default)]
    node_p: Option<String>,
    #[serde(rename = "nodeQ", default)]
    node_q: Option<String>,
}

/// Ordered collection of node specifications with O(1) lookup by id
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    rows: Vec<NodeSpec>,
    index: FxHashMap<String, usize>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row after validating its probabilities.
    ///
    /// Fails with a config error on a blank id, a duplicate id or a
    /// probability outside `[0, 1]`.
    pub fn insert(&mut self, spec: NodeSpec) -> Result<()> {
        let id = spec.id.trim();
        if id.is_empty() {
            return Err(SimError::config("node id must not be empty"));
        }
        if self.index.contains_key(id) {
            return Err(SimError::config(format!("duplicate node id '{}'", id)));
        }
        check_probability(id, "probP", spec.prob_p)?;
        check_probability(id, "probQ", spec.prob_q)?;

        let spec = NodeSpec { id: id.to_string(), ..spec };
        self.index.insert(spec.id.clone(), self.rows.len());
        self.rows.push(spec);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&NodeSpec> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[NodeSpec] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build a table from rows, stopping at the first invalid one.
    pub fn from_specs<I: IntoIterator<Item = NodeSpec>>(specs: I) -> Result<Self> {
        let mut table = Self::new();
        for spec in specs {
            table.insert(spec)?;
        }
        Ok(table)
    }

    /// Parse the JSON mapping form.
    ///
    /// Missing or non-numeric probabilities are a config error, never a
    /// silent zero. Numeric strings are accepted as in the CSV form.
    /// Rows are inserted in id order so the result does not depend on map
    /// iteration order.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: std::collections::BTreeMap<String, JsonRow> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (id, row) in raw {
            let prob_p = json_probability(&id, "probP", row.prob_p.as_ref())?;
            let prob_q = json_probability(&id, "probQ", row.prob_q.as_ref())?;
            table.insert(NodeSpec::new(
                id,
                prob_p,
                prob_q,
                row.node_p.as_deref(),
                row.node_q.as_deref(),
            ))?;
        }
        Ok(table)
    }
}

fn json_probability(id: &str, field: &str, value: Option<&serde_json::Value>) -> Result<f64> {
    use serde_json::Value;

    let parsed = match value {
        None | Some(Value::Null) => {
            return Err(SimError::config(format!("node '{}' is missing {}", id, field)))
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    parsed.ok_or_else(|| {
        SimError::config(format!(
            "node '{}': invalid {} value {}",
            id,
            field,
            value.map(|v| v.to_string()).unwrap_or_default()
        ))
    })
}

fn check_probability(id: &str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SimError::config(format!(
            "node '{}': {} must be within [0, 1], got {}",
            id, field, value
        )));
    }
    Ok(())
}
