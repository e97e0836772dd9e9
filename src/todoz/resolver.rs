//! Status/deletion state machine.
//!
//! [`decide`] looks at a classified line and the pass [`Mode`] and says what
//! should happen to it, without touching the store. The driver in
//! [`commands::handle`](crate::commands::handle) carries the decision out and
//! turns it into an [`Action`] on the document.
//!
//! | line                 | Read        | Write                          |
//! |----------------------|-------------|--------------------------------|
//! | not a todo/malformed | keep        | keep                           |
//! | untagged, open       | keep        | allocate + insert, tag line    |
//! | tagged, open         | keep        | sync record (re-tag if stale)  |
//! | untagged, done       | keep        | drop line                      |
//! | tagged, done         | keep        | drop line, delete record       |

use crate::line::{LineKind, TodoLine};
use crate::model::{Mode, TodoId};

/// A decision borrows the classified todo it acts on, so carrying it out never
/// has to look back at the [`LineKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'l, 'a> {
    /// Leave the line exactly as it is.
    Keep,
    /// New todo: allocate an id, create its record and tag the line.
    Allocate(&'l TodoLine<'a>),
    /// Known todo: bring the record in line with the text. A tag that cannot
    /// keep its id (stale or already used in the pass) is re-tagged.
    Sync { id: TodoId, todo: &'l TodoLine<'a> },
    /// Finished todo: remove the line and, when tagged, its record.
    Remove { id: Option<TodoId> },
}

/// What happens to one document line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Passthrough,
    Tag { id: TodoId, line: String },
    Drop,
}

pub fn decide<'l, 'a>(kind: &'l LineKind<'a>, mode: Mode) -> Decision<'l, 'a> {
    if mode == Mode::Read {
        return Decision::Keep;
    }
    match kind {
        LineKind::NotATodo | LineKind::Malformed(_) => Decision::Keep,
        LineKind::Untagged(todo) if todo.is_done() => Decision::Remove { id: None },
        LineKind::Untagged(todo) => Decision::Allocate(todo),
        LineKind::Tagged { id, todo } if todo.is_done() => Decision::Remove { id: Some(*id) },
        LineKind::Tagged { id, todo } => Decision::Sync { id: *id, todo },
    }
}
