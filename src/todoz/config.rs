use crate::error::{Result, TodozError};
use crate::line::CheckboxStates;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Characters that would break the `[<state>]` / `%<id>%` surface syntax.
const RESERVED_STATE_CHARS: [char; 5] = [']', '[', '%', '\n', '\r'];

/// What `delete` does when several records match the same text in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguousDelete {
    /// Refuse and report every candidate id.
    #[default]
    Fail,
    /// Delete the most recently created candidate.
    MostRecent,
}

impl AmbiguousDelete {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbiguousDelete::Fail => "fail",
            AmbiguousDelete::MostRecent => "most-recent",
        }
    }
}

/// Configuration for todoz, stored in `<home>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodozConfig {
    /// Checkbox characters meaning "not done yet" (matched case-sensitively)
    #[serde(default = "default_open_states")]
    pub open_states: Vec<char>,

    /// Checkbox characters meaning "done"; lines carrying them are removed on save
    /// (matched case-insensitively)
    #[serde(default = "default_done_states")]
    pub done_states: Vec<char>,

    #[serde(default)]
    pub ambiguous_delete: AmbiguousDelete,
}

fn default_open_states() -> Vec<char> {
    vec![' ']
}

fn default_done_states() -> Vec<char> {
    vec!['d']
}

impl Default for TodozConfig {
    fn default() -> Self {
        Self {
            open_states: default_open_states(),
            done_states: default_done_states(),
            ambiguous_delete: AmbiguousDelete::default(),
        }
    }
}

impl TodozConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TodozError::Io)?;
        let config: TodozConfig =
            serde_json::from_str(&content).map_err(TodozError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        self.validate()?;
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TodozError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TodozError::Serialization)?;
        fs::write(config_path, content).map_err(TodozError::Io)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.open_states.is_empty() {
            return Err(TodozError::Config("open-states must not be empty".into()));
        }
        if self.done_states.is_empty() {
            return Err(TodozError::Config("done-states must not be empty".into()));
        }
        for c in self.open_states.iter().chain(&self.done_states) {
            if RESERVED_STATE_CHARS.contains(c) {
                return Err(TodozError::Config(format!(
                    "{:?} cannot be used as a checkbox state",
                    c
                )));
            }
        }
        let states = self.checkbox_states();
        if let Some(c) = self.open_states.iter().find(|c| states.is_done(**c)) {
            return Err(TodozError::Config(format!(
                "{:?} is listed as both an open and a done state",
                c
            )));
        }
        Ok(())
    }

    pub fn checkbox_states(&self) -> CheckboxStates {
        CheckboxStates::new(self.open_states.clone(), self.done_states.clone())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "open-states" => Some(format!("{:?}", self.open_states.iter().collect::<String>())),
            "done-states" => Some(format!("{:?}", self.done_states.iter().collect::<String>())),
            "ambiguous-delete" => Some(self.ambiguous_delete.as_str().to_string()),
            _ => None,
        }
    }

    /// Set a key from its CLI spelling. State sets are given as a string of characters.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let mut candidate = self.clone();
        match key {
            "open-states" => candidate.open_states = value.chars().collect(),
            "done-states" => candidate.done_states = value.chars().collect(),
            "ambiguous-delete" => {
                candidate.ambiguous_delete = match value {
                    "fail" => AmbiguousDelete::Fail,
                    "most-recent" => AmbiguousDelete::MostRecent,
                    other => {
                        return Err(format!(
                            "Invalid value for ambiguous-delete: {} (expected fail or most-recent)",
                            other
                        ))
                    }
                }
            }
            other => return Err(format!("Unknown config key: {}", other)),
        }
        candidate.validate().map_err(|e| e.to_string())?;
        *self = candidate;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["open-states", "done-states", "ambiguous-delete"]
    }
}
