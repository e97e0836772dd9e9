use crate::config::TodozConfig;
use crate::model::TodoRecord;
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod handle;
pub mod helpers;
pub mod load;
pub mod search;

/// Where todoz keeps its state: `todos.json`, `todos.lock` and `config.json`.
#[derive(Debug, Clone)]
pub struct TodozPaths {
    pub home: PathBuf,
}

impl TodozPaths {
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.home.clone()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.home.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Document lines produced by the command (`handle`, `load`).
    pub lines: Vec<String>,
    pub affected_todos: Vec<TodoRecord>,
    pub listed_todos: Vec<TodoRecord>,
    pub config: Option<TodozConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_affected_todos(mut self, todos: Vec<TodoRecord>) -> Self {
        self.affected_todos = todos;
        self
    }

    pub fn with_listed_todos(mut self, todos: Vec<TodoRecord>) -> Self {
        self.listed_todos = todos;
        self
    }

    pub fn with_config(mut self, config: TodozConfig) -> Self {
        self.config = Some(config);
        self
    }
}
