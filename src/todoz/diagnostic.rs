//! Error presentation for the binary.
//!
//! Every entry point runs through [`guarded`], which turns a surfaced error into
//! a diagnostic block on stderr and an exit code. Nothing in the library prints.

use colored::*;
use todoz::error::TodozError;

/// Runs `op` and reports its error, if any. Returns the process exit code.
pub fn guarded<F>(command: &str, op: F) -> i32
where
    F: FnOnce() -> todoz::error::Result<()>,
{
    match op() {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(command, error = ?e, "command failed");
            eprintln!("{}", render(command, &e));
            1
        }
    }
}

pub fn render(command: &str, error: &TodozError) -> String {
    let mut out = format!(
        "{} {}\n  {} {}",
        "error:".red().bold(),
        error,
        "while running".dimmed(),
        command
    );
    if let Some(hint) = hint(error) {
        out.push_str(&format!("\n  {} {}", "hint:".yellow(), hint));
    }
    out
}

fn hint(error: &TodozError) -> Option<&'static str> {
    match error {
        TodozError::StoreUnavailable(_) => {
            Some("the document was left untouched; check TODOZ_HOME and retry")
        }
        TodozError::AmbiguousMatch { .. } => {
            Some("delete by id instead, or set `todoz config ambiguous-delete most-recent`")
        }
        TodozError::AllocationExhausted(_) => Some("no new todo ids can be issued"),
        TodozError::Config(_) => Some("fix or remove config.json in the todoz home directory"),
        TodozError::NotFound(_)
        | TodozError::InvalidInput(_)
        | TodozError::Io(_)
        | TodozError::Serialization(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoz::model::TodoId;

    #[test]
    fn failing_op_exits_with_one() {
        colored::control::set_override(false);
        let code = guarded("handle", || Err(TodozError::StoreUnavailable("gone".into())));
        assert_eq!(code, 1);
        assert_eq!(guarded("handle", || Ok(())), 0);
    }

    #[test]
    fn renders_hint_for_ambiguity() {
        colored::control::set_override(false);
        let text = render(
            "delete",
            &TodozError::AmbiguousMatch {
                text: "dup".into(),
                ids: vec![TodoId(1), TodoId(2)],
            },
        );
        assert!(text.contains("error: Ambiguous match: 2 todos match 'dup' (1, 2)"));
        assert!(text.contains("hint:"));
    }
}
