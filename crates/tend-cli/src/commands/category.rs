use clap::Subcommand;

use super::{category_label, open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category (stored lowercase)
    Add {
        /// Category name
        name: String,
    },
    /// List categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: CategoryAction) -> CliResult {
    let (config, mut engine) = open_engine()?;

    match action {
        CategoryAction::Add { name } => match engine.add_category(&name)? {
            Some(event) => print_json(&event)?,
            None => eprintln!("category not added: '{name}' is blank or already exists"),
        },
        CategoryAction::List { json } => {
            if json {
                print_json(engine.categories().as_slice())?;
            } else {
                for name in engine.categories() {
                    let marker = if name == engine.selected_category() { "*" } else { " " };
                    println!("{marker} {}", category_label(&config, name));
                }
            }
        }
    }
    Ok(())
}
