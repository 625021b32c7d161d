use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Lookup error: node '{id}' referenced by '{referenced_by}' has no table row")]
    Lookup { id: String, referenced_by: String },

    #[error("Graph error: cycle detected through {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SimError {
    /// Errors raised while turning a table into a graph.
    pub fn is_graph_error(&self) -> bool {
        matches!(self, SimError::Lookup { .. } | SimError::Cycle { .. })
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SimError::Config(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        SimError::InvariantViolation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
