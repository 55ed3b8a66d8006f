//! Todo items and the ordered on-device todo store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category: category.into(),
            completed: false,
        }
    }
}

/// Todos in creation order, addressable by id.
///
/// Serializes as a plain JSON array of [`Todo`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoStore {
    todos: Vec<Todo>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Todo] {
        &self.todos
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.todos.iter()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Append a todo with a trimmed title. Blank titles are rejected.
    pub fn add(&mut self, title: &str, category: &str) -> Option<&Todo> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        self.todos.push(Todo::new(title, category));
        self.todos.last()
    }

    /// Flip the completion flag. Returns the new value, `None` if unknown.
    pub fn toggle(&mut self, id: Uuid) -> Option<bool> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        Some(todo.completed)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Todo> {
        let idx = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(idx))
    }

    /// Set the flag on every todo whose id is in `ids`. Returns how many changed.
    pub fn mark_completed(&mut self, ids: &HashSet<Uuid>) -> usize {
        let mut changed = 0;
        for todo in self.todos.iter_mut().filter(|t| ids.contains(&t.id)) {
            if !todo.completed {
                todo.completed = true;
                changed += 1;
            }
        }
        changed
    }

    /// Todos in `category`, compared case-insensitively.
    ///
    /// The iterator is lazy and can be cloned to walk the view again.
    pub fn filter_by_category<'a>(
        &'a self,
        category: &str,
    ) -> impl Iterator<Item = &'a Todo> + Clone + 'a {
        let wanted = category.to_lowercase();
        self.todos
            .iter()
            .filter(move |t| t.category.to_lowercase() == wanted)
    }

    pub fn incomplete(&self) -> impl Iterator<Item = &Todo> + Clone {
        self.todos.iter().filter(|t| !t.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Todo> + Clone {
        self.todos.iter().filter(|t| t.completed)
    }

    pub fn titles(&self) -> Vec<String> {
        self.todos.iter().map(|t| t.title.clone()).collect()
    }
}

impl From<Vec<Todo>> for TodoStore {
    fn from(todos: Vec<Todo>) -> Self {
        Self { todos }
    }
}

impl<'a> IntoIterator for &'a TodoStore {
    type Item = &'a Todo;
    type IntoIter = std::slice::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
