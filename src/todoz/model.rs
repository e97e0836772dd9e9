use crate::error::{Result, TodozError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Durable identifier of a todo record, embedded in documents as `%<id>%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl TodoId {
    /// The in-document tag, e.g. `%13%`.
    pub fn tag(self) -> String {
        format!("%{}%", self.0)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = TodozError;

    /// Accepts `13` or `%13%`. Leading zeros are rejected so that a parsed id
    /// always renders back to the same text.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix('%')
            .and_then(|rest| rest.strip_suffix('%'))
            .unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TodozError::InvalidInput(format!("Not a todo id: {}", s)));
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(TodozError::InvalidInput(format!(
                "Todo ids have no leading zeros: {}",
                s
            )));
        }
        digits
            .parse::<u64>()
            .map(TodoId)
            .map_err(|_| TodozError::InvalidInput(format!("Todo id out of range: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Open,
    Done,
}

/// Which editor event triggered a document pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Document opened: never allocates, never deletes.
    Read,
    /// Document saved: tags new todos and drops completed ones.
    Write,
}

impl FromStr for Mode {
    type Err = TodozError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Mode::Read),
            "write" => Ok(Mode::Write),
            other => Err(TodozError::InvalidInput(format!(
                "Unknown mode '{}' (expected read or write)",
                other
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => write!(f, "read"),
            Mode::Write => write!(f, "write"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: TodoId,
    pub path: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoRecord {
    pub fn new(id: TodoId, path: String, text: String, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            path,
            text,
            tags,
            status: TodoStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// True if the visible parts of a todo line differ from what is stored.
    pub fn differs_from(&self, text: &str, tags: &[String]) -> bool {
        self.text != text || self.tags != tags
    }
}
