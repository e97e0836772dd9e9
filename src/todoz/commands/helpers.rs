use crate::error::{Result, TodozError};
use crate::line::{classify, split_tags, CheckboxStates, LineKind};
use crate::model::TodoId;

/// A todo given on the command line, either as a full line or as bare text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoArgs {
    pub id: Option<TodoId>,
    pub text: String,
    pub tags: Vec<String>,
}

/// What `delete` should remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Id(TodoId),
    Text(String),
}

pub fn parse_todo_args(args: &str, states: &CheckboxStates) -> Result<TodoArgs> {
    let args = args.trim();
    let parsed = match classify(args, states) {
        LineKind::Tagged { id, todo } => TodoArgs {
            id: Some(id),
            text: todo.text.to_string(),
            tags: todo.tags,
        },
        LineKind::Untagged(todo) => TodoArgs {
            id: None,
            text: todo.text.to_string(),
            tags: todo.tags,
        },
        LineKind::NotATodo | LineKind::Malformed(_) => {
            let (text, tags) = split_tags(args);
            TodoArgs {
                id: None,
                text: text.trim().to_string(),
                tags,
            }
        }
    };

    if parsed.text.is_empty() {
        return Err(TodozError::InvalidInput(
            "A todo needs a description".to_string(),
        ));
    }
    Ok(parsed)
}

/// `13`, `%13%` and tagged lines select by id; anything else is matched by text.
pub fn parse_delete_target(args: &str, states: &CheckboxStates) -> Result<DeleteTarget> {
    let args = args.trim();
    if let Ok(id) = args.parse::<TodoId>() {
        return Ok(DeleteTarget::Id(id));
    }
    let parsed = parse_todo_args(args, states)?;
    Ok(match parsed.id {
        Some(id) => DeleteTarget::Id(id),
        None => DeleteTarget::Text(parsed.text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> CheckboxStates {
        CheckboxStates::default()
    }

    #[test]
    fn todo_args_from_lines_and_text() {
        let tagged = parse_todo_args("-%4% [ ] call bob {t:phone}", &states()).unwrap();
        assert_eq!(tagged.id, Some(TodoId(4)));
        assert_eq!(tagged.text, "call bob");
        assert_eq!(tagged.tags, vec!["phone".to_string()]);

        let untagged = parse_todo_args("  - [ ] call bob  ", &states()).unwrap();
        assert_eq!(untagged.id, None);
        assert_eq!(untagged.text, "call bob");

        let plain = parse_todo_args("call bob {t:b,a}", &states()).unwrap();
        assert_eq!(plain.text, "call bob");
        assert_eq!(plain.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_description_is_rejected() {
        for args in ["", "   ", "{t:only}", "  {t:a, b}"] {
            assert!(
                matches!(
                    parse_todo_args(args, &states()),
                    Err(TodozError::InvalidInput(_))
                ),
                "{:?}",
                args
            );
        }
    }

    #[test]
    fn delete_targets() {
        let s = states();
        assert_eq!(parse_delete_target("13", &s).unwrap(), DeleteTarget::Id(TodoId(13)));
        assert_eq!(parse_delete_target("%13%", &s).unwrap(), DeleteTarget::Id(TodoId(13)));
        assert_eq!(
            parse_delete_target("-%13% [ ] x", &s).unwrap(),
            DeleteTarget::Id(TodoId(13))
        );
        assert_eq!(
            parse_delete_target("- [ ] buy milk", &s).unwrap(),
            DeleteTarget::Text("buy milk".into())
        );
        assert_eq!(
            parse_delete_target("buy milk", &s).unwrap(),
            DeleteTarget::Text("buy milk".into())
        );
    }
}
