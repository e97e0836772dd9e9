use clap::Parser;
use directories::ProjectDirs;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use todoz::api::{ConfigAction, TodozApi, TodozPaths};
use todoz::config::TodozConfig;
use todoz::error::{Result, TodozError};
use todoz::model::Mode;
use todoz::store::fs::FileStore;
use tracing_subscriber::EnvFilter;

mod args;
mod diagnostic;
mod print;
use args::{Cli, Commands};
use print::{print_config, print_messages, print_todos};

const HOME_ENV: &str = "TODOZ_HOME";
const LOG_ENV: &str = "TODOZ_LOG";

fn main() {
    let cli = Cli::parse();
    install_tracing(cli.verbose);
    let name = command_name(&cli.command);
    let code = diagnostic::guarded(name, || run(cli));
    std::process::exit(code);
}

/// Logs go to stderr; stdout carries document lines.
fn install_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Handle { .. } => "handle",
        Commands::Create { .. } => "create",
        Commands::Delete { .. } => "delete",
        Commands::Load { .. } => "load",
        Commands::Search { .. } => "search",
        Commands::Config { .. } => "config",
    }
}

struct AppContext {
    api: TodozApi<FileStore>,
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context()?;

    match cli.command {
        Commands::Handle {
            path,
            mode,
            file,
            in_place,
        } => handle_document(&mut ctx, path, mode, file, in_place),
        Commands::Create { path, args } => handle_create(&mut ctx, &path, &args.join(" ")),
        Commands::Delete { path, args } => handle_delete(&mut ctx, &path, &args.join(" ")),
        Commands::Load { output, force } => handle_load(&ctx, output, force),
        Commands::Search { terms } => handle_search(&ctx, &terms.join(" ")),
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

fn todoz_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "todoz", "todoz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            TodozError::Config(format!(
                "Could not determine a data directory; set {}",
                HOME_ENV
            ))
        })
}

fn init_context() -> Result<AppContext> {
    let home = todoz_home()?;
    let paths = TodozPaths::new(home);
    let config = TodozConfig::load(paths.config_dir())?;
    let store = FileStore::new(paths.store_dir());
    tracing::debug!(store = %store.store_file().display(), "opened store");

    Ok(AppContext {
        api: TodozApi::new(store, config, paths),
    })
}

fn handle_document(
    ctx: &mut AppContext,
    path: Option<String>,
    mode: Mode,
    file: Option<PathBuf>,
    in_place: bool,
) -> Result<()> {
    let content = match &file {
        Some(file) => fs::read_to_string(file)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let path = match (path, &file) {
        (Some(path), _) => path,
        (None, Some(file)) => file.display().to_string(),
        (None, None) => {
            return Err(TodozError::InvalidInput(
                "--path is required when reading from stdin".to_string(),
            ))
        }
    };

    let lines: Vec<&str> = content.lines().collect();
    let result = ctx.api.handle(lines.as_slice(), &path, mode)?;
    let rendered = join_lines(
        &result.lines,
        line_ending(&content),
        content.ends_with('\n'),
    );

    match file {
        Some(file) if in_place => write_atomic(&file, &rendered),
        _ => {
            print!("{}", rendered);
            Ok(())
        }
    }
}

fn handle_create(ctx: &mut AppContext, path: &str, args: &str) -> Result<()> {
    let result = ctx.api.create_todo(args, path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, path: &str, args: &str) -> Result<()> {
    let result = ctx.api.delete_todo(args, path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_load(ctx: &AppContext, output: Option<PathBuf>, force: bool) -> Result<()> {
    let result = ctx.api.load_todos()?;
    let rendered = join_lines(&result.lines, "\n", true);
    match output {
        Some(output) => {
            if output.exists() && !force {
                return Err(TodozError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                )));
            }
            write_atomic(&output, &rendered)
        }
        None => {
            print!("{}", rendered);
            Ok(())
        }
    }
}

fn handle_search(ctx: &AppContext, query: &str) -> Result<()> {
    let result = ctx.api.search_todos(query)?;
    print_todos(&result.listed_todos);
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

/// `str::lines` drops the `\r` of CRLF documents; they are written back with it.
fn line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn join_lines(lines: &[String], ending: &str, trailing_newline: bool) -> String {
    let mut out = lines.join(ending);
    if trailing_newline && !lines.is_empty() {
        out.push_str(ending);
    }
    out
}

/// Replaces `target` through a sibling temp file so a failed write never
/// leaves a truncated document behind.
fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = dir.join(format!(".todoz-{}.tmp", uuid::Uuid::new_v4()));
    if let Err(e) = fs::write(&tmp, content).and_then(|_| fs::rename(&tmp, target)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_trailing_newline() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(join_lines(&lines, "\n", true), "a\nb\n");
        assert_eq!(join_lines(&lines, "\n", false), "a\nb");
        assert_eq!(join_lines(&[], "\n", true), "");
    }

    #[test]
    fn crlf_documents_keep_their_line_endings() {
        let content = "# Notes\r\n- [ ] x\r\n";
        let ending = line_ending(content);
        assert_eq!(ending, "\r\n");

        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        assert_eq!(lines, vec!["# Notes", "- [ ] x"]);
        assert_eq!(join_lines(&lines, ending, content.ends_with('\n')), content);
        assert_eq!(line_ending("a\nb\n"), "\n");
    }

    #[test]
    fn atomic_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc.md");
        fs::write(&target, "old").unwrap();
        write_atomic(&target, "new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
