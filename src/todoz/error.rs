use crate::model::TodoId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodozError {
    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Identifier space exhausted at {0}")]
    AllocationExhausted(TodoId),

    #[error("Ambiguous match: {} todos match '{}' ({})", .ids.len(), .text, join_ids(.ids))]
    AmbiguousMatch { text: String, ids: Vec<TodoId> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TodozError {
    /// Wraps a store-side failure, keeping the location it happened at.
    pub fn store(location: impl std::fmt::Display, cause: impl std::fmt::Display) -> Self {
        TodozError::StoreUnavailable(format!("{}: {}", location, cause))
    }
}

fn join_ids(ids: &[TodoId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, TodozError>;
