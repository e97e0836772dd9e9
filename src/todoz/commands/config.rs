use crate::commands::{CmdMessage, CmdResult, TodozPaths};
use crate::config::TodozConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Runs a config action against `<home>/config.json`. A successful `Set` returns
/// the new configuration in `CmdResult::config`.
pub fn run(paths: &TodozPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = paths.config_dir();
    let mut config = TodozConfig::load(&dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => {
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                result.add_message(CmdMessage::error(e));
                return Ok(result);
            }
            config.save(&dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result.with_config(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::config::AmbiguousDelete;
    use tempfile::tempdir;

    #[test]
    fn set_persists_and_returns_config() {
        let dir = tempdir().unwrap();
        let paths = TodozPaths::new(dir.path().to_path_buf());

        let result = run(
            &paths,
            ConfigAction::Set("ambiguous-delete".into(), "most-recent".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(
            result.config.unwrap().ambiguous_delete,
            AmbiguousDelete::MostRecent
        );

        let reloaded = TodozConfig::load(dir.path()).unwrap();
        assert_eq!(reloaded.ambiguous_delete, AmbiguousDelete::MostRecent);
    }

    #[test]
    fn invalid_set_is_reported_not_saved() {
        let dir = tempdir().unwrap();
        let paths = TodozPaths::new(dir.path().to_path_buf());

        let result = run(&paths, ConfigAction::Set("done-states".into(), " ".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.config.is_none());
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn show_key() {
        let dir = tempdir().unwrap();
        let paths = TodozPaths::new(dir.path().to_path_buf());

        let result = run(&paths, ConfigAction::ShowKey("done-states".into())).unwrap();
        assert_eq!(result.messages[0].content, "\"d\"");
        let result = run(&paths, ConfigAction::ShowKey("nope".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
    }
}
