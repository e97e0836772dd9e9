use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TodozError};
use crate::line::CheckboxStates;
use crate::store::DataStore;

use super::helpers::parse_todo_args;

/// Creates (or refreshes) a todo outside of any document pass.
///
/// `args` is either a todo line or plain text. A tag naming a live record
/// updates that record; otherwise the record is matched by `(path, text)` and
/// created when there is no match.
pub fn run<S: DataStore>(
    store: &mut S,
    states: &CheckboxStates,
    args: &str,
    path: &str,
) -> Result<CmdResult> {
    let parsed = parse_todo_args(args, states)?;

    let (record, existed) = store.transaction(|table| {
        let known = parsed.id.filter(|id| table.contains(*id));
        let existed = known.is_some() || !table.find(path, &parsed.text).is_empty();
        let id = match known {
            Some(id) => {
                table.update(id, &parsed.text, &parsed.tags)?;
                id
            }
            None => table.create_or_update(path, &parsed.text, &parsed.tags)?,
        };
        let record = table.get(id).cloned().ok_or(TodozError::NotFound(id))?;
        Ok((record, existed))
    })?;

    let mut result = CmdResult::default();
    let verb = if existed { "updated" } else { "created" };
    result.add_message(CmdMessage::success(format!(
        "Todo {} ({}): {}",
        verb,
        record.id.tag(),
        record.text
    )));
    Ok(result.with_affected_todos(vec![record]))
}
