use chrono::Local;
use clap::Subcommand;
use indexmap::IndexMap;
use serde::Serialize;

use super::{category_label, open_engine, print_json, CliResult};
use tend_core::archive::{self, format_clock};
use tend_core::{ArchiveSummary, FocusSession, Todo};

#[derive(Subcommand)]
pub enum ArchiveAction {
    /// Total focus and break time across all sessions
    Totals {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved sessions, newest last
    Sessions {
        /// Only sessions dated today (local time)
        #[arg(long)]
        today: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Working todos split into open and completed, grouped by category
    Tasks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct TaskArchive<'a> {
    incomplete: IndexMap<String, Vec<&'a Todo>>,
    completed: IndexMap<String, Vec<&'a Todo>>,
}

pub fn run(action: ArchiveAction) -> CliResult {
    let (config, engine) = open_engine()?;

    match action {
        ArchiveAction::Totals { json } => {
            let summary = ArchiveSummary::from_sessions(engine.history());
            if json {
                print_json(&summary)?;
            } else {
                println!("Sessions:    {}", summary.session_count);
                println!("Focus time:  {}", format_clock(summary.total_focus_secs));
                println!("Break time:  {}", format_clock(summary.total_break_secs));
                println!("Todos done:  {}", summary.completed_todos);
                for (category, secs) in &summary.focus_by_category {
                    println!("  {:<12} {}", category_label(&config, category), format_clock(*secs));
                }
            }
        }
        ArchiveAction::Sessions { today, json } => {
            let sessions: Vec<&FocusSession> = if today {
                archive::sessions_on(engine.history(), Local::now().date_naive(), &Local)
            } else {
                engine.history().iter().collect()
            };
            if json {
                print_json(&sessions)?;
            } else {
                for session in sessions {
                    print_session(&config, session);
                }
            }
        }
        ArchiveAction::Tasks { json } => {
            let view = TaskArchive {
                incomplete: archive::group_by_category(engine.todos().incomplete()),
                completed: archive::group_by_category(engine.todos().completed()),
            };
            if json {
                print_json(&view)?;
            } else {
                for (heading, groups) in [("Open", &view.incomplete), ("Completed", &view.completed)] {
                    println!("{heading}:");
                    for (category, todos) in groups {
                        println!("  {}:", category_label(&config, category));
                        for todo in todos {
                            println!("    - {}", todo.title);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_session(config: &tend_core::Config, session: &FocusSession) {
    let when = session.date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let categories: Vec<String> = session
        .category_times
        .iter()
        .map(|(name, secs)| format!("{} {}", category_label(config, name), format_clock(*secs)))
        .collect();
    println!(
        "{when}  {}  break {}  {}/{} todos",
        categories.join(", "),
        format_clock(session.break_time),
        session.completed_todos.len(),
        session.todos.len(),
    );
}
