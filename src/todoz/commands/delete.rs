use crate::commands::{CmdMessage, CmdResult};
use crate::config::AmbiguousDelete;
use crate::error::{Result, TodozError};
use crate::line::CheckboxStates;
use crate::model::{TodoId, TodoRecord};
use crate::store::DataStore;
use tracing::debug;

use super::helpers::{parse_delete_target, DeleteTarget};

pub fn run<S: DataStore>(
    store: &mut S,
    states: &CheckboxStates,
    policy: AmbiguousDelete,
    args: &str,
    path: &str,
) -> Result<CmdResult> {
    let target = parse_delete_target(args, states)?;

    let removed = store.transaction(|table| {
        let id = match &target {
            DeleteTarget::Id(id) => Some(*id),
            DeleteTarget::Text(text) => pick(&table.find(path, text), text, policy)?,
        };
        let Some(id) = id else {
            return Ok(None);
        };
        let record = table.get(id).cloned();
        table.delete(id);
        Ok(record)
    })?;

    let mut result = CmdResult::default();
    match removed {
        Some(record) => {
            result.add_message(CmdMessage::success(format!(
                "Todo deleted ({}): {}",
                record.id.tag(),
                record.text
            )));
            Ok(result.with_affected_todos(vec![record]))
        }
        None => {
            debug!(args, path, "nothing to delete");
            result.add_message(CmdMessage::info("No matching todo"));
            Ok(result)
        }
    }
}

fn pick(candidates: &[&TodoRecord], text: &str, policy: AmbiguousDelete) -> Result<Option<TodoId>> {
    match candidates {
        [] => Ok(None),
        [only] => Ok(Some(only.id)),
        _ => match policy {
            AmbiguousDelete::Fail => Err(TodozError::AmbiguousMatch {
                text: text.to_string(),
                ids: candidates.iter().map(|r| r.id).collect(),
            }),
            AmbiguousDelete::MostRecent => Ok(candidates
                .iter()
                .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
                .map(|r| r.id)),
        },
    }
}
