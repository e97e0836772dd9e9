use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &S, query: &str) -> Result<CmdResult> {
    let hits = store.search(query)?;
    let mut result = CmdResult::default();
    if hits.is_empty() {
        result.add_message(CmdMessage::info(format!("No todos match '{}'", query)));
    }
    Ok(result.with_listed_todos(hits))
}
