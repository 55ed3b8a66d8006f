//! Blob keys and typed load/save helpers over a [`KeyValueStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::kv::KeyValueStore;
use crate::error::Result;

/// Serialized `Vec<Todo>`.
pub const TODOS_KEY: &str = "persistedTodos";
/// Serialized `Vec<FocusSession>`.
pub const SESSIONS_KEY: &str = "previousSessions";
/// Serialized `Vec<String>` of category labels.
pub const CATEGORIES_KEY: &str = "persistedCategories";
/// Legacy set of todo ids marked complete, folded into `Todo::completed` on load.
pub const LEGACY_COMPLETED_IDS_KEY: &str = "completedTodoIDs";

/// Load the collection stored under `key`.
///
/// A missing key yields the default. Read or decode failures are logged and
/// also yield the default; persisted data never takes the engine down.
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable persisted data");
            T::default()
        }
    }
}

/// Load and decode the blob under `key`, surfacing failures.
///
/// # Errors
/// Returns an error if the store read fails or the blob does not decode.
pub fn load<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
        None => Ok(None),
    }
}

/// Encode `value` and store it under `key`.
///
/// # Errors
/// Returns an error if encoding or the store write fails.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let blob = serde_json::to_string(value)?;
    store.set(key, &blob)
}
