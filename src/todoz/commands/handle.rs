//! Whole-document pass: the buffer transform driver.
//!
//! The host hands over every line of a document together with its path and the
//! pass [`Mode`] and gets back the replacement lines. Each input line yields zero
//! or one output lines, in order.
//!
//! - **Read** passes return the input unchanged and never open the store.
//! - **Write** passes classify every line first, then carry out all decisions
//!   inside a single store transaction. If the store fails anywhere the whole
//!   pass fails, nothing is persisted and the caller keeps its original lines.
//!
//! Within one write pass a tag keeps its id only on the first open line that
//! carries it, and only while its record exists and no done line in the same
//! document carries the same tag. Every other open line is re-tagged with a
//! fresh id. Ids seen as tags are retired from the allocator up front, so a
//! fresh id never collides with a tag already in the document.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::line::{classify, CheckboxStates, LineKind};
use crate::model::{Mode, TodoId};
use crate::resolver::{decide, Action, Decision};
use crate::store::{DataStore, TodoTable};
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HandleSummary {
    pub tagged: usize,
    pub updated: usize,
    pub retagged: usize,
    pub removed: usize,
}

impl HandleSummary {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

pub fn run<S: DataStore>(
    store: &mut S,
    states: &CheckboxStates,
    lines: &[String],
    path: &str,
    mode: Mode,
) -> Result<CmdResult> {
    let kinds: Vec<LineKind<'_>> = lines.iter().map(|l| classify(l, states)).collect();
    debug!(
        path,
        %mode,
        lines = lines.len(),
        todos = kinds.iter().filter(|k| k.is_todo()).count(),
        "classified document"
    );

    if mode == Mode::Read {
        return Ok(CmdResult::default().with_lines(lines.to_vec()));
    }

    let (actions, summary) = store.transaction(|table| {
        let mut pass = WritePass::new(path, &kinds);
        for kind in &kinds {
            if let Some(id) = kind.tag_id() {
                table.retire(id);
            }
        }
        let mut actions = Vec::with_capacity(kinds.len());
        for kind in &kinds {
            actions.push(pass.apply(table, decide(kind, Mode::Write))?);
        }
        Ok((actions, pass.summary))
    })?;

    let mut output = Vec::with_capacity(lines.len());
    for (line, action) in lines.iter().zip(actions) {
        match action {
            Action::Passthrough => output.push(line.clone()),
            Action::Tag { line, .. } => output.push(line),
            Action::Drop => {}
        }
    }

    let mut result = CmdResult::default().with_lines(output);
    if !summary.is_noop() {
        info!(
            path,
            tagged = summary.tagged,
            updated = summary.updated,
            retagged = summary.retagged,
            removed = summary.removed,
            "write pass"
        );
        result.add_message(CmdMessage::success(format!(
            "{}: {} tagged, {} updated, {} re-tagged, {} removed",
            path, summary.tagged, summary.updated, summary.retagged, summary.removed
        )));
    }
    if summary.retagged > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{}: {} tag(s) could not keep their id and were replaced",
            path, summary.retagged
        )));
    }
    Ok(result)
}

/// Per-pass bookkeeping for which tags may keep their id.
struct WritePass<'p> {
    path: &'p str,
    /// Tags carried by done lines. Their records go away in this pass.
    finished: HashSet<TodoId>,
    /// Tags already synced by an earlier open line.
    claimed: HashSet<TodoId>,
    summary: HandleSummary,
}

impl<'p> WritePass<'p> {
    fn new(path: &'p str, kinds: &[LineKind<'_>]) -> Self {
        let finished = kinds
            .iter()
            .filter_map(|kind| match kind {
                LineKind::Tagged { id, todo } if todo.is_done() => Some(*id),
                _ => None,
            })
            .collect();
        Self {
            path,
            finished,
            claimed: HashSet::new(),
            summary: HandleSummary::default(),
        }
    }

    fn apply(&mut self, table: &mut TodoTable, decision: Decision<'_, '_>) -> Result<Action> {
        match decision {
            Decision::Keep => Ok(Action::Passthrough),
            Decision::Allocate(todo) => {
                let record = table.insert(self.path, todo.text, &todo.tags)?;
                self.summary.tagged += 1;
                Ok(Action::Tag {
                    id: record.id,
                    line: todo.with_id(record.id),
                })
            }
            Decision::Sync { id, todo } => {
                let first = self.claimed.insert(id);
                if first && !self.finished.contains(&id) && table.contains(id) {
                    if table.update(id, todo.text, &todo.tags)? {
                        self.summary.updated += 1;
                    }
                    return Ok(Action::Passthrough);
                }
                let record = table.insert(self.path, todo.text, &todo.tags)?;
                warn!(
                    old = %id,
                    id = %record.id,
                    path = self.path,
                    "tag cannot keep its id, re-tagged"
                );
                self.summary.retagged += 1;
                Ok(Action::Tag {
                    id: record.id,
                    line: todo.with_id(record.id),
                })
            }
            Decision::Remove { id } => {
                if let Some(id) = id {
                    table.delete(id);
                }
                self.summary.removed += 1;
                Ok(Action::Drop)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::TodozError;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    const PATH: &str = "notes/todo.md";

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn write<S: DataStore>(store: &mut S, lines: &[String]) -> Vec<String> {
        run(store, &CheckboxStates::default(), lines, PATH, Mode::Write)
            .unwrap()
            .lines
    }

    fn read<S: DataStore>(store: &mut S, lines: &[String]) -> Vec<String> {
        run(store, &CheckboxStates::default(), lines, PATH, Mode::Read)
            .unwrap()
            .lines
    }

    fn mixed_document() -> Vec<String> {
        doc(&[
            "# Shopping",
            "",
            "- [ ] bla bub ()",
            "- [ ] bla bub '()'",
            "'- [ ] invalid single quote'",
            "- [b] xxxx: invalid",
            "[ ] xxxx: invalid",
            "\t* [ ] nested {t:home}",
            "- [d] finished before it was tagged",
            "some prose",
        ])
    }

    #[test]
    fn tags_untagged_open_lines() {
        let mut store = InMemoryStore::new();
        let out = write(&mut store, &doc(&["- [ ] bla bub ()", "- [ ] bla bub '()'"]));
        assert_eq!(out, doc(&["-%1% [ ] bla bub ()", "-%2% [ ] bla bub '()'"]));

        let records = store.get_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "bla bub ()");
        assert_eq!(records[0].path, PATH);
        assert_eq!(records[1].text, "bla bub '()'");
    }

    #[test]
    fn invalid_lines_are_unchanged_in_write_mode() {
        let mut store = InMemoryStore::new();
        let input = doc(&[
            "'- [ ] invalid single quote'",
            "- [b] xxxx: invalid",
            "[ ] xxxx: invalid",
        ]);
        assert_eq!(write(&mut store, &input), input);
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn done_tagged_line_is_dropped_and_record_deleted() {
        let mut fixture = StoreFixture::new().with_next_id(123).with_todo(PATH, "should be deleted");
        assert_eq!(fixture.ids, vec![TodoId(123)]);

        let out = write(&mut fixture.store, &doc(&["-%123% [d] should be deleted"]));
        assert!(out.is_empty());
        assert!(fixture.store.get(TodoId(123)).unwrap().is_none());
    }

    #[test]
    fn done_untagged_line_is_dropped_without_record() {
        let mut store = InMemoryStore::new();
        let out = write(&mut store, &doc(&["before", "- [D] never tracked", "after"]));
        assert_eq!(out, doc(&["before", "after"]));
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn write_pass_is_idempotent() {
        let mut store = InMemoryStore::new();
        let once = write(&mut store, &mixed_document());
        let saves = store.backend().save_count();
        let twice = write(&mut store, &once);
        assert_eq!(once, twice);
        // The second pass had nothing to do and must not touch the store.
        assert_eq!(store.backend().save_count(), saves);
        assert_eq!(store.get_all().unwrap().len(), 3);
    }

    #[test]
    fn tagging_is_stable_across_passes() {
        let mut store = InMemoryStore::new();
        let first = write(&mut store, &doc(&["- [ ] stay put"]));
        let mut current = first.clone();
        for _ in 0..3 {
            current = write(&mut store, &current);
        }
        assert_eq!(current, first);
        let records = store.get_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, TodoId(1));
    }

    #[test]
    fn read_mode_never_mutates() {
        let mut fixture = StoreFixture::new().with_todo(PATH, "tracked");
        let input = doc(&[
            "- [ ] untagged",
            "-%1% [d] done tagged",
            "- [d] done untagged",
            "- [b] malformed",
            "-%1% [ ] tracked edited",
        ]);
        assert_eq!(read(&mut fixture.store, &input), input);
        assert_eq!(fixture.store.backend().save_count(), 1);
        let records = fixture.store.get_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "tracked");
    }

    #[test]
    fn malformed_lines_are_invariant_in_any_mode() {
        let malformed = ["- [b] xxxx: invalid", "-%007% [ ] zeros", "  * [?] odd state"];
        for line in malformed {
            let input = doc(&[line]);
            let mut store = InMemoryStore::new();
            assert_eq!(read(&mut store, &input), input);
            assert_eq!(write(&mut store, &input), input);
            assert!(store.get_all().unwrap().is_empty());
        }
    }

    #[test]
    fn edited_text_updates_record() {
        let mut fixture = StoreFixture::new().with_todo(PATH, "old text");
        let input = doc(&["-%1% [ ] new text {t:b,a}"]);
        assert_eq!(write(&mut fixture.store, &input), input);
        let record = fixture.store.get(TodoId(1)).unwrap().unwrap();
        assert_eq!(record.text, "new text");
        assert_eq!(record.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn stale_tag_is_retagged() {
        let mut store = InMemoryStore::new();
        let out = write(&mut store, &doc(&["  -%42% [ ] from another machine"]));
        assert_eq!(out, doc(&["  -%43% [ ] from another machine"]));
        assert_eq!(store.get_all().unwrap()[0].text, "from another machine");
        // And it settles.
        assert_eq!(write(&mut store, &out), out);
    }

    #[test]
    fn stale_id_is_never_handed_out_later() {
        let mut store = InMemoryStore::new();
        write(&mut store, &doc(&["-%42% [ ] from another machine"]));
        let next = write(&mut store, &doc(&["- [ ] made here"]));
        assert_eq!(next, doc(&["-%44% [ ] made here"]));

        // A second copy of the stale tag elsewhere does not hijack a record.
        let other = write(&mut store, &doc(&["-%42% [ ] copied elsewhere"]));
        assert_eq!(other, doc(&["-%45% [ ] copied elsewhere"]));
        assert_eq!(
            store.get(TodoId(43)).unwrap().unwrap().text,
            "from another machine"
        );
    }

    #[test]
    fn fresh_ids_skip_tags_already_in_the_document() {
        let mut store = InMemoryStore::new();
        let out = write(&mut store, &doc(&["- [ ] new", "-%1% [ ] pasted"]));
        assert_eq!(out, doc(&["-%2% [ ] new", "-%3% [ ] pasted"]));
        assert!(store.get(TodoId(1)).unwrap().is_none());
    }

    #[test]
    fn done_and_open_copies_of_one_tag_settle() {
        for input in [
            doc(&["-%1% [ ] a", "-%1% [d] a"]),
            doc(&["-%1% [d] a", "-%1% [ ] a"]),
        ] {
            let mut fixture = StoreFixture::new().with_todo(PATH, "a");
            let once = write(&mut fixture.store, &input);
            assert_eq!(once, doc(&["-%2% [ ] a"]), "{:?}", input);
            assert!(fixture.store.get(TodoId(1)).unwrap().is_none());
            assert_eq!(fixture.store.get(TodoId(2)).unwrap().unwrap().text, "a");

            let saves = fixture.store.backend().save_count();
            assert_eq!(write(&mut fixture.store, &once), once);
            assert_eq!(fixture.store.backend().save_count(), saves);
        }
    }

    #[test]
    fn first_open_copy_of_a_tag_keeps_the_id() {
        let mut fixture = StoreFixture::new().with_todo(PATH, "a");
        let once = write(&mut fixture.store, &doc(&["-%1% [ ] a", "-%1% [ ] b"]));
        assert_eq!(once, doc(&["-%1% [ ] a", "-%2% [ ] b"]));
        assert_eq!(fixture.store.get(TodoId(1)).unwrap().unwrap().text, "a");
        assert_eq!(fixture.store.get(TodoId(2)).unwrap().unwrap().text, "b");

        let saves = fixture.store.backend().save_count();
        assert_eq!(write(&mut fixture.store, &once), once);
        assert_eq!(fixture.store.backend().save_count(), saves);
    }

    #[test]
    fn retagging_is_reported_as_a_warning() {
        let mut fixture = StoreFixture::new().with_todo(PATH, "a");
        let result = run(
            &mut fixture.store,
            &CheckboxStates::default(),
            &doc(&["-%1% [ ] a", "-%1% [ ] a"]),
            PATH,
            Mode::Write,
        )
        .unwrap();
        let warning = result
            .messages
            .iter()
            .find(|m| m.level == MessageLevel::Warning)
            .unwrap();
        assert!(warning.content.contains("1 tag(s)"));
    }

    #[test]
    fn store_failure_rolls_back_everything() {
        let mut fixture = StoreFixture::new().with_todo(PATH, "keep me");
        fixture.store.backend().set_simulate_write_error(true);

        let input = doc(&["- [ ] new one", "-%1% [d] keep me"]);
        let result = run(
            &mut fixture.store,
            &CheckboxStates::default(),
            &input,
            PATH,
            Mode::Write,
        );
        assert!(matches!(result, Err(TodozError::StoreUnavailable(_))));

        fixture.store.backend().set_simulate_write_error(false);
        let records = fixture.store.get_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "keep me");
    }

    #[test]
    fn reports_summary() {
        let mut fixture = StoreFixture::new().with_todo(PATH, "gone");
        let result = run(
            &mut fixture.store,
            &CheckboxStates::default(),
            &doc(&["- [ ] a", "- [ ] b", "-%1% [d] gone"]),
            PATH,
            Mode::Write,
        )
        .unwrap();
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains("2 tagged"));
        assert!(result.messages[0].content.contains("1 removed"));
    }

    #[test]
    fn empty_document() {
        let mut store = InMemoryStore::new();
        assert!(write(&mut store, &[]).is_empty());
        assert_eq!(store.backend().save_count(), 0);
    }
}
