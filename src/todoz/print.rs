use chrono::Utc;
use colored::*;
use todoz::api::{CmdMessage, MessageLevel};
use todoz::config::TodozConfig;
use todoz::model::TodoRecord;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 7;
const PATH_WIDTH: usize = 24;
const TIME_WIDTH: usize = 14;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_todos(todos: &[TodoRecord]) {
    for todo in todos {
        println!("{}", todo_row(todo));
    }
}

pub fn print_config(config: &TodozConfig) {
    for key in TodozConfig::keys() {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

/// One table row: id, text (with tags), path and relative update time.
fn todo_row(todo: &TodoRecord) -> String {
    let id = format!("{:<width$}", todo.id.tag(), width = ID_WIDTH);
    let path = pad_to_width(&truncate_to_width(&todo.path, PATH_WIDTH), PATH_WIDTH);
    let time_ago = format_time_ago(todo.updated_at);

    let text = if todo.tags.is_empty() {
        todo.text.clone()
    } else {
        format!("{} [{}]", todo.text, todo.tags.join(","))
    };
    let available = LINE_WIDTH.saturating_sub(ID_WIDTH + PATH_WIDTH + TIME_WIDTH + 2);
    let text = pad_to_width(&truncate_to_width(&text, available), available);

    format!(
        "{}{} {} {}",
        id.yellow(),
        text,
        path.cyan(),
        time_ago.dimmed()
    )
}

fn pad_to_width(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
