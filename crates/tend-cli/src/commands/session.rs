//! Interactive focus session driven from stdin.
//!
//! The session ticks in the background while commands are read line by line.
//! Once it ends, the open todos are offered for marking before the session
//! is saved or abandoned. Events go to stdout as JSON; prompts and the
//! summary go to stderr so the event stream stays machine-readable.

use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use uuid::Uuid;

use super::{category_label, open_engine, print_json, CliResult};
use tend_core::archive::format_clock;
use tend_core::{Config, Database, Event, FocusEngine, SessionRunner, SessionSummary, Todo};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a focus session until `end` (or EOF) is read
    Run {
        /// Category to focus on
        #[arg(long, short)]
        category: Option<String>,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Break,
    Category(&'a str),
    Toggle(usize),
    Status,
    End,
    Help,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Option<Input<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (cmd, arg) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, a)| (c, a.trim()));
    Some(match cmd {
        "b" | "break" => Input::Break,
        "c" | "category" if !arg.is_empty() => Input::Category(arg),
        "t" | "todo" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Input::Toggle(n),
            _ => Input::Unknown(line),
        },
        "s" | "status" => Input::Status,
        "e" | "end" => Input::End,
        "h" | "help" | "?" => Input::Help,
        _ => Input::Unknown(line),
    })
}

/// Input accepted once the session has ended.
#[derive(Debug, PartialEq, Eq)]
enum Wrapup<'a> {
    Toggle(usize),
    Save,
    Abandon,
    Help,
    Unknown(&'a str),
}

fn parse_wrapup(line: &str) -> Option<Wrapup<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (cmd, arg) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, a)| (c, a.trim()));
    Some(match cmd {
        "t" | "todo" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Wrapup::Toggle(n),
            _ => Wrapup::Unknown(line),
        },
        "s" | "save" | "y" | "yes" => Wrapup::Save,
        "a" | "abandon" | "n" | "no" => Wrapup::Abandon,
        "h" | "help" | "?" => Wrapup::Help,
        _ => Wrapup::Unknown(line),
    })
}

const HELP: &str = "commands: b(reak) | c(ategory) <name> | t(odo) <n> | s(tatus) | e(nd) | h(elp)";
const WRAPUP_HELP: &str = "mark completed: t(odo) <n> | s(ave) | a(bandon) | h(elp)";

type StdinLines = Lines<BufReader<Stdin>>;

pub fn run(action: SessionAction) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    match action {
        SessionAction::Run { category } => runtime.block_on(run_session(category)),
    }
}

async fn run_session(category: Option<String>) -> CliResult {
    let (config, mut engine) = open_engine()?;
    if let Some(name) = category {
        if engine.select_category(&name).is_none() {
            return Err(format!("unknown category: {name}").into());
        }
    }

    let (runner, started) = SessionRunner::start(engine);
    if let Some(event) = started {
        print_json(&event)?;
    }
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_line(&line) else {
            continue;
        };
        tracing::debug!(?input, "session input");
        match input {
            Input::Break => {
                if let Some(event) = runner.toggle_break().await? {
                    print_json(&event)?;
                }
            }
            Input::Category(name) => match runner.select_category(name).await? {
                Some(event) => print_json(&event)?,
                None => eprintln!("unknown category: {name}"),
            },
            Input::Toggle(n) => {
                let summary = runner.summary().await?;
                match summary.todos.get(n - 1) {
                    Some(todo) => {
                        if let Some(event) = runner.toggle_todo(todo.id).await? {
                            print_json(&event)?;
                        }
                    }
                    None => eprintln!("no todo #{n}"),
                }
            }
            Input::Status => {
                print_json(&runner.snapshot().await?)?;
                print_todos(&runner.summary().await?.todos);
            }
            Input::End => break,
            Input::Help => eprintln!("{HELP}"),
            Input::Unknown(text) => eprintln!("unknown command: {text}"),
        }
    }

    let (mut engine, ended) = runner.end().await?;
    if let Some(event) = ended {
        print_json(&event)?;
    }
    let summary = engine.summary();
    print_summary(&config, &summary);

    if let Some(event) = wrap_up(&mut engine, &summary, &mut lines).await? {
        print_json(&event)?;
    }
    Ok(())
}

/// Let the user mark the todos that were open when the session ended, then
/// save or abandon. EOF abandons.
async fn wrap_up(
    engine: &mut FocusEngine<Database>,
    summary: &SessionSummary,
    lines: &mut StdinLines,
) -> CliResult<Option<Event>> {
    let candidates: Vec<Uuid> = summary.incomplete.iter().map(|t| t.id).collect();
    if !candidates.is_empty() {
        eprintln!("Mark Completed Tasks:");
        print_candidates(engine, &candidates);
    }
    eprintln!("{WRAPUP_HELP}");

    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_wrapup(&line) else {
            continue;
        };
        tracing::debug!(?input, "wrap-up input");
        match input {
            Wrapup::Toggle(n) => match candidates.get(n - 1) {
                Some(&id) => {
                    if let Some(event) = engine.toggle_completion(id)? {
                        print_json(&event)?;
                    }
                    print_candidates(engine, &candidates);
                }
                None => eprintln!("no todo #{n}"),
            },
            Wrapup::Save => {
                let completed = engine.completed_titles();
                return Ok(engine.save_session(completed)?);
            }
            Wrapup::Abandon => break,
            Wrapup::Help => eprintln!("{WRAPUP_HELP}"),
            Wrapup::Unknown(text) => eprintln!("unknown command: {text}"),
        }
    }
    Ok(engine.abandon())
}

fn print_candidates(engine: &FocusEngine<Database>, ids: &[Uuid]) {
    let todos: Vec<Todo> = ids
        .iter()
        .filter_map(|id| engine.todos().get(*id).cloned())
        .collect();
    print_todos(&todos);
}

fn print_todos(todos: &[Todo]) {
    for (i, todo) in todos.iter().enumerate() {
        let mark = if todo.completed { "x" } else { " " };
        eprintln!("{:>3}. [{mark}] {}", i + 1, todo.title);
    }
}

fn print_summary(config: &Config, summary: &SessionSummary) {
    eprintln!("Session Summary");
    eprintln!("  Category:   {}", category_label(config, &summary.category));
    eprintln!("  Focus Time: {}", format_clock(summary.focus_secs));
    eprintln!("  Break Time: {}", format_clock(summary.break_secs));
    if !summary.todos.is_empty() {
        eprintln!("  Tasks:");
        print_todos(&summary.todos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(parse_line("b"), Some(Input::Break));
        assert_eq!(parse_line("  break "), Some(Input::Break));
        assert_eq!(parse_line("c Deep Work"), Some(Input::Category("Deep Work")));
        assert_eq!(parse_line("todo 2"), Some(Input::Toggle(2)));
        assert_eq!(parse_line("s"), Some(Input::Status));
        assert_eq!(parse_line("end"), Some(Input::End));
        assert_eq!(parse_line("?"), Some(Input::Help));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("t 0"), Some(Input::Unknown("t 0")));
        assert_eq!(parse_line("t x"), Some(Input::Unknown("t x")));
        assert_eq!(parse_line("c"), Some(Input::Unknown("c")));
        assert_eq!(parse_line("dance"), Some(Input::Unknown("dance")));
    }

    #[test]
    fn parses_wrapup_input() {
        assert_eq!(parse_wrapup("t 1"), Some(Wrapup::Toggle(1)));
        assert_eq!(parse_wrapup(" s "), Some(Wrapup::Save));
        assert_eq!(parse_wrapup("y"), Some(Wrapup::Save));
        assert_eq!(parse_wrapup("a"), Some(Wrapup::Abandon));
        assert_eq!(parse_wrapup("no"), Some(Wrapup::Abandon));
        assert_eq!(parse_wrapup(""), None);
        assert_eq!(parse_wrapup("t"), Some(Wrapup::Unknown("t")));
        assert_eq!(parse_wrapup("b"), Some(Wrapup::Unknown("b")));
    }
}
