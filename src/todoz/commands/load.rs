use crate::commands::CmdResult;
use crate::error::Result;
use crate::line::CheckboxStates;
use crate::store::DataStore;
use crate::view;

pub fn run<S: DataStore>(store: &S, states: &CheckboxStates) -> Result<CmdResult> {
    let records = store.get_all()?;
    let lines = view::render(&records, states.canonical_open());
    Ok(CmdResult::default()
        .with_lines(lines)
        .with_listed_todos(records))
}
