pub mod archive;
pub mod category;
pub mod config;
pub mod session;
pub mod todo;

use serde::Serialize;
use tend_core::{Config, Database, FocusEngine};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the on-disk store and load the engine with the current config.
pub fn open_engine() -> CliResult<(Config, FocusEngine<Database>)> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let engine = FocusEngine::load(db, &config.focus);
    Ok((config, engine))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Category label for display. Stored names stay lowercase.
pub fn category_label(config: &Config, name: &str) -> String {
    if !config.display.capitalize_categories {
        return name.to_string();
    }
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_capitalize_each_word() {
        let mut config = Config::default();
        assert_eq!(category_label(&config, "deep work"), "Deep Work");
        assert_eq!(category_label(&config, "work"), "Work");

        config.display.capitalize_categories = false;
        assert_eq!(category_label(&config, "deep work"), "deep work");
    }
}
