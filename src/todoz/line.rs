//! # Line Classifier
//!
//! Decides, one line at a time, whether a line of markdown is a todo and pulls it
//! apart. The surface syntax is:
//!
//! ```text
//! <indent><marker>[%<id>%] [<state>] <text> [{t:<tag>,<tag>}]
//!   \t      - or *   tag    checkbox   description   annotation
//! ```
//!
//! Examples:
//!
//! ```text
//! - [ ] buy milk                 -> Untagged, open
//! -%13% [ ] buy milk             -> Tagged(13), open
//! -%13% [d] buy milk             -> Tagged(13), done
//! - [b] buy milk                 -> Malformed (unknown state)
//! [ ] buy milk                   -> NotATodo (no list marker)
//! '- [ ] buy milk'               -> NotATodo (quoted)
//! ```
//!
//! Classification is a pure function of the line and the configured
//! [`CheckboxStates`]; it never looks at neighbouring lines and never fails.

use crate::model::TodoId;
use once_cell::sync::Lazy;
use regex::Regex;

static TODO_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<indent>[ \t]*)(?P<marker>[-*])(?:[ ]?%(?P<id>[^%\s]*)%)?[ \t]*(?P<body>\[(?P<state>[^\]])\](?P<rest>.*))$",
    )
    .expect("todo shape pattern is valid")
});

static TAG_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<text>.*?)\s*\{t:(?P<tags>[^{}]*)\}$").expect("tag pattern is valid")
});

const QUOTES: [char; 3] = ['\'', '"', '`'];

/// Which checkbox characters count as open and which as done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxStates {
    open: Vec<char>,
    done: Vec<char>,
}

impl Default for CheckboxStates {
    fn default() -> Self {
        Self::new(vec![' '], vec!['d'])
    }
}

impl CheckboxStates {
    pub fn new(open: Vec<char>, done: Vec<char>) -> Self {
        Self { open, done }
    }

    /// Open states match exactly, done states ignore case.
    pub fn checkbox(&self, c: char) -> Option<Checkbox> {
        if self.open.contains(&c) {
            Some(Checkbox::Open(c))
        } else if self.is_done(c) {
            Some(Checkbox::Done(c))
        } else {
            None
        }
    }

    pub fn is_done(&self, c: char) -> bool {
        self.done.iter().any(|d| d.to_lowercase().eq(c.to_lowercase()))
    }

    /// The state used when rendering records back into a document.
    pub fn canonical_open(&self) -> char {
        self.open.first().copied().unwrap_or(' ')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkbox {
    Open(char),
    Done(char),
}

impl Checkbox {
    pub fn is_done(&self) -> bool {
        matches!(self, Checkbox::Done(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    UnknownState(char),
    BadTag(String),
}

/// A line that has the full todo shape, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoLine<'a> {
    pub indent: &'a str,
    pub marker: char,
    pub checkbox: Checkbox,
    /// Description without the tag annotation, trimmed.
    pub text: &'a str,
    /// Normalized labels from a trailing `{t:...}` annotation.
    pub tags: Vec<String>,
    /// Everything from the opening `[` to the end of the line, verbatim.
    body: &'a str,
}

impl TodoLine<'_> {
    /// Renders the line with `id` inserted right after the list marker.
    /// Any tag already present is replaced.
    pub fn with_id(&self, id: TodoId) -> String {
        format!("{}{}{} {}", self.indent, self.marker, id.tag(), self.body)
    }

    pub fn is_done(&self) -> bool {
        self.checkbox.is_done()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    NotATodo,
    Malformed(MalformedReason),
    Untagged(TodoLine<'a>),
    Tagged { id: TodoId, todo: TodoLine<'a> },
}

impl LineKind<'_> {
    pub fn is_todo(&self) -> bool {
        matches!(self, LineKind::Untagged(_) | LineKind::Tagged { .. })
    }

    pub fn tag_id(&self) -> Option<TodoId> {
        match self {
            LineKind::Tagged { id, .. } => Some(*id),
            _ => None,
        }
    }
}

pub fn classify<'a>(line: &'a str, states: &CheckboxStates) -> LineKind<'a> {
    if is_quoted(line) {
        return LineKind::NotATodo;
    }

    let Some(caps) = TODO_SHAPE.captures(line) else {
        return LineKind::NotATodo;
    };

    let (Some(indent), Some(marker), Some(state), Some(rest), Some(body)) = (
        caps.name("indent"),
        caps.name("marker").and_then(|m| m.as_str().chars().next()),
        caps.name("state").and_then(|m| m.as_str().chars().next()),
        caps.name("rest"),
        caps.name("body"),
    ) else {
        return LineKind::NotATodo;
    };

    // The checkbox must be followed by whitespace and a description.
    let rest = rest.as_str();
    if !rest.starts_with(char::is_whitespace) {
        return LineKind::NotATodo;
    }
    let (text, tags) = split_tags(rest.trim());
    if text.is_empty() {
        return LineKind::NotATodo;
    }

    let Some(checkbox) = states.checkbox(state) else {
        return LineKind::Malformed(MalformedReason::UnknownState(state));
    };

    let todo = TodoLine {
        indent: indent.as_str(),
        marker,
        checkbox,
        text,
        tags,
        body: body.as_str(),
    };

    match caps.name("id") {
        None => LineKind::Untagged(todo),
        Some(raw) => match raw.as_str().parse::<TodoId>() {
            Ok(id) => LineKind::Tagged { id, todo },
            Err(_) => LineKind::Malformed(MalformedReason::BadTag(raw.as_str().to_string())),
        },
    }
}

/// A line whose whole visible content sits inside one pair of quotes.
fn is_quoted(line: &str) -> bool {
    let visible = line.trim();
    let mut chars = visible.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => first == last && QUOTES.contains(&first),
        _ => false,
    }
}

/// Splits a description into its text and the labels of a trailing `{t:...}`
/// annotation.
pub fn split_tags(description: &str) -> (&str, Vec<String>) {
    match TAG_ANNOTATION.captures(description) {
        Some(caps) => {
            let text = caps.name("text").map_or("", |m| m.as_str()).trim();
            let tags = caps.name("tags").map_or("", |m| m.as_str());
            (text, normalize_tags(tags))
        }
        None => (description, Vec::new()),
    }
}

/// Splits a comma separated tag list into trimmed, sorted, unique labels.
pub fn normalize_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = raw
        .split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// The `{t:...}` annotation for a set of tags, empty when there are none.
pub fn tag_annotation(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!("{{t:{}}}", tags.join(","))
    }
}
