//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every todoz operation, whatever the host is (the CLI, an
//! editor plugin, tests).
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the context**: the store handle and the effective configuration,
//!   constructed explicitly by the host and dropped when the host is done
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Presentation**: no stdout or stderr; errors are returned, not displayed
//!
//! ## Generic Over DataStore
//!
//! `TodozApi<S: DataStore>` is generic over the storage backend:
//! - Production: `TodozApi<FileStore>`
//! - Testing: `TodozApi<InMemoryStore>`

use crate::commands;
use crate::config::TodozConfig;
use crate::error::Result;
use crate::model::Mode;
use crate::store::DataStore;

/// The main API facade for todoz operations.
pub struct TodozApi<S: DataStore> {
    store: S,
    config: TodozConfig,
    paths: commands::TodozPaths,
}

impl<S: DataStore> TodozApi<S> {
    pub fn new(store: S, config: TodozConfig, paths: commands::TodozPaths) -> Self {
        Self {
            store,
            config,
            paths,
        }
    }

    /// Transforms a whole document. The replacement lines are in `CmdResult::lines`.
    pub fn handle<L: AsRef<str>>(
        &mut self,
        lines: &[L],
        path: &str,
        mode: Mode,
    ) -> Result<commands::CmdResult> {
        let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
        let states = self.config.checkbox_states();
        commands::handle::run(&mut self.store, &states, &lines, path, mode)
    }

    pub fn create_todo(&mut self, args: &str, path: &str) -> Result<commands::CmdResult> {
        let states = self.config.checkbox_states();
        commands::create::run(&mut self.store, &states, args, path)
    }

    pub fn delete_todo(&mut self, args: &str, path: &str) -> Result<commands::CmdResult> {
        let states = self.config.checkbox_states();
        commands::delete::run(
            &mut self.store,
            &states,
            self.config.ambiguous_delete,
            args,
            path,
        )
    }

    /// The aggregation document, in `CmdResult::lines`.
    pub fn load_todos(&self) -> Result<commands::CmdResult> {
        commands::load::run(&self.store, &self.config.checkbox_states())
    }

    pub fn search_todos(&self, query: &str) -> Result<commands::CmdResult> {
        commands::search::run(&self.store, query)
    }

    pub fn config(&mut self, action: ConfigAction) -> Result<commands::CmdResult> {
        let result = commands::config::run(&self.paths, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel, TodozPaths};
