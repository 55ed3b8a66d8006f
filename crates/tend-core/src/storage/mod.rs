mod config;
pub mod database;
mod kv;
pub mod persisted;

pub use config::{Config, DisplayConfig, FocusConfig};
pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore};

use std::path::PathBuf;

/// Returns the directory holding `tend.db` and `config.toml`.
///
/// `TEND_DATA_DIR` wins when set. Otherwise `~/.config/tend[-dev]/`,
/// with the `-dev` suffix selected by `TEND_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("TEND_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TEND_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tend-dev")
            } else {
                base_dir.join("tend")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
