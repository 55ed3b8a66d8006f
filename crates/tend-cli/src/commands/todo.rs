use clap::Subcommand;
use uuid::Uuid;

use super::{category_label, open_engine, print_json, CliResult};
use tend_core::archive;

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a todo to the working list
    Add {
        /// Todo title
        title: String,
        /// Category to file it under (defaults to the configured category)
        #[arg(long, short)]
        category: Option<String>,
    },
    /// List the working todos
    List {
        /// Only show todos in this category
        #[arg(long, short)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a todo between open and completed
    Toggle {
        /// Todo ID
        id: Uuid,
    },
    /// Remove a todo from the working list
    Remove {
        /// Todo ID
        id: Uuid,
    },
}

pub fn run(action: TodoAction) -> CliResult {
    let (config, mut engine) = open_engine()?;

    match action {
        TodoAction::Add { title, category } => {
            if let Some(category) = category {
                if engine.select_category(&category).is_none() {
                    return Err(format!("unknown category: {category}").into());
                }
            }
            match engine.add_todo(&title)? {
                Some(event) => print_json(&event)?,
                None => eprintln!("todo not added: title is blank"),
            }
        }
        TodoAction::List { category, json } => {
            let todos: Vec<_> = match &category {
                Some(name) => engine.todos().filter_by_category(name).collect(),
                None => engine.todos().iter().collect(),
            };
            if json {
                print_json(&todos)?;
            } else {
                for (category, group) in archive::group_by_category(todos) {
                    println!("{}:", category_label(&config, &category));
                    for todo in group {
                        let mark = if todo.completed { "x" } else { " " };
                        println!("  [{mark}] {} ({})", todo.title, todo.id);
                    }
                }
            }
        }
        TodoAction::Toggle { id } => match engine.toggle_completion(id)? {
            Some(event) => print_json(&event)?,
            None => return Err(format!("todo not found: {id}").into()),
        },
        TodoAction::Remove { id } => match engine.remove_todo(id)? {
            Some(event) => print_json(&event)?,
            None => return Err(format!("todo not found: {id}").into()),
        },
    }
    Ok(())
}
