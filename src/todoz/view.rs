//! Aggregation view: every live record as one markdown document.
//!
//! ```text
//! # notes/home.md
//! -%4% [ ] water plants
//!
//! # notes/work.md
//! -%1% [ ] write report {t:urgent}
//! ```
//!
//! Every rendered todo line classifies back as a tagged open todo with the
//! record's text and tags, so the document can be edited and written back
//! through the normal write pass.

use crate::line::tag_annotation;
use crate::model::TodoRecord;

/// Renders records, which must already be in aggregation order (see
/// [`DataStore::get_all`](crate::store::DataStore::get_all)).
pub fn render(records: &[TodoRecord], open_state: char) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<&str> = None;

    for record in records {
        if current != Some(record.path.as_str()) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("# {}", record.path));
            current = Some(record.path.as_str());
        }
        lines.push(render_record(record, open_state));
    }
    lines
}

pub fn render_record(record: &TodoRecord, open_state: char) -> String {
    let line = format!("-{} [{}] {}", record.id.tag(), open_state, record.text);
    match tag_annotation(&record.tags) {
        annotation if annotation.is_empty() => line,
        annotation => format!("{} {}", line, annotation),
    }
}
