//! Focus session engine.
//!
//! A single-owner state machine over the session counters, the category
//! list, the working todo list and the archived history. It does not run a
//! clock: the owner calls `tick()` once per second while a session is active
//! (see [`super::SessionRunner`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Active (Focusing <-> OnBreak) -> Ending -> Idle
//! ```
//!
//! Out-of-phase commands are no-ops and return `None`. Commands that persist
//! write through the injected [`KeyValueStore`] before changing memory, so a
//! failed write leaves the engine where it was.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = FocusEngine::load(store, &config.focus);
//! engine.start();
//! engine.tick();
//! engine.end_session();
//! engine.save_session(engine.completed_titles())?;
//! ```

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::FocusSession;
use crate::categories::CategoryList;
use crate::error::Result;
use crate::events::Event;
use crate::storage::persisted::{
    self, CATEGORIES_KEY, LEGACY_COMPLETED_IDS_KEY, SESSIONS_KEY, TODOS_KEY,
};
use crate::storage::{FocusConfig, KeyValueStore};
use crate::todo::{Todo, TodoStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Active,
    /// Timer stopped, waiting for the user to mark completions and save.
    Ending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    Focusing,
    OnBreak,
}

impl FocusMode {
    fn toggled(self) -> Self {
        match self {
            FocusMode::Focusing => FocusMode::OnBreak,
            FocusMode::OnBreak => FocusMode::Focusing,
        }
    }
}

/// What the completion step shows before the session is saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub category: String,
    pub focus_secs: u64,
    pub break_secs: u64,
    pub todos: Vec<Todo>,
    /// Todos still open, offered for marking.
    pub incomplete: Vec<Todo>,
}

pub struct FocusEngine<S> {
    store: S,
    phase: SessionPhase,
    mode: FocusMode,
    elapsed_focus_secs: u64,
    elapsed_break_secs: u64,
    categories: CategoryList,
    todos: TodoStore,
    history: Vec<FocusSession>,
}

impl<S: KeyValueStore> FocusEngine<S> {
    /// Load persisted categories, todos and history from `store`.
    ///
    /// Anything missing or undecodable starts empty. Categories fall back to
    /// the configured seeds; the legacy completed-id set is folded into the
    /// todo flags and removed.
    pub fn load(store: S, config: &FocusConfig) -> Self {
        let persisted_categories: Vec<String> =
            persisted::load_or_default(&store, CATEGORIES_KEY);
        let categories = if persisted_categories.is_empty() {
            CategoryList::new(&config.default_categories)
        } else {
            CategoryList::new(persisted_categories)
        }
        .with_selection(&config.default_category);

        let mut todos: TodoStore = persisted::load_or_default(&store, TODOS_KEY);
        migrate_legacy_completion(&store, &mut todos);

        let history: Vec<FocusSession> = persisted::load_or_default(&store, SESSIONS_KEY);

        tracing::debug!(
            categories = categories.len(),
            todos = todos.len(),
            sessions = history.len(),
            "focus engine loaded"
        );

        Self {
            store,
            phase: SessionPhase::Idle,
            mode: FocusMode::Focusing,
            elapsed_focus_secs: 0,
            elapsed_break_secs: 0,
            categories,
            todos,
            history,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mode(&self) -> FocusMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn is_on_break(&self) -> bool {
        self.mode == FocusMode::OnBreak
    }

    pub fn elapsed_focus_secs(&self) -> u64 {
        self.elapsed_focus_secs
    }

    pub fn elapsed_break_secs(&self) -> u64 {
        self.elapsed_break_secs
    }

    pub fn categories(&self) -> &CategoryList {
        &self.categories
    }

    pub fn selected_category(&self) -> &str {
        self.categories.selected()
    }

    pub fn todos(&self) -> &TodoStore {
        &self.todos
    }

    pub fn history(&self) -> &[FocusSession] {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Titles of todos flagged complete, in list order.
    pub fn completed_titles(&self) -> Vec<String> {
        self.todos.completed().map(|t| t.title.clone()).collect()
    }

    /// Todos of the selected category, the view shown while focusing.
    pub fn current_todos(&self) -> impl Iterator<Item = &Todo> + Clone {
        self.todos.filter_by_category(self.categories.selected())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            category: self.categories.selected().to_string(),
            focus_secs: self.elapsed_focus_secs,
            break_secs: self.elapsed_break_secs,
            todos: self.todos.as_slice().to_vec(),
            incomplete: self.todos.incomplete().cloned().collect(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            mode: self.mode,
            focus_secs: self.elapsed_focus_secs,
            break_secs: self.elapsed_break_secs,
            selected_category: self.categories.selected().to_string(),
            todo_count: self.todos.len(),
            at: Utc::now(),
        }
    }

    // ── Session commands ─────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Idle {
            return None;
        }
        self.phase = SessionPhase::Active;
        self.mode = FocusMode::Focusing;
        tracing::debug!(category = self.categories.selected(), "session started");
        Some(Event::SessionStarted {
            category: self.categories.selected().to_string(),
            at: Utc::now(),
        })
    }

    /// Count one second against the current mode. Returns whether it counted.
    pub fn tick(&mut self) -> bool {
        if self.phase != SessionPhase::Active {
            return false;
        }
        match self.mode {
            FocusMode::OnBreak => self.elapsed_break_secs += 1,
            FocusMode::Focusing => self.elapsed_focus_secs += 1,
        }
        true
    }

    pub fn toggle_break(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.mode = self.mode.toggled();
        tracing::debug!(mode = ?self.mode, "break toggled");
        Some(Event::BreakToggled {
            mode: self.mode,
            focus_secs: self.elapsed_focus_secs,
            break_secs: self.elapsed_break_secs,
            at: Utc::now(),
        })
    }

    pub fn end_session(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.phase = SessionPhase::Ending;
        tracing::debug!(
            focus_secs = self.elapsed_focus_secs,
            break_secs = self.elapsed_break_secs,
            "session ended"
        );
        Some(Event::SessionEnded {
            focus_secs: self.elapsed_focus_secs,
            break_secs: self.elapsed_break_secs,
            at: Utc::now(),
        })
    }

    /// Archive the ended session and return to Idle.
    ///
    /// All focus time is credited to the category selected right now;
    /// earlier selections within the same session get nothing.
    ///
    /// # Errors
    /// If writing the history fails, the engine stays in `Ending` and the call
    /// can be retried. If only clearing the todo list fails, the session is
    /// already archived and the engine is `Idle`; the error is still returned.
    pub fn save_session(&mut self, completed_titles: Vec<String>) -> Result<Option<Event>> {
        if self.phase != SessionPhase::Ending {
            return Ok(None);
        }

        let session = FocusSession::new(
            self.categories.selected(),
            self.elapsed_focus_secs,
            self.elapsed_break_secs,
            self.todos.titles(),
            completed_titles,
        );
        let event = Event::SessionSaved {
            session_id: session.id,
            category: self.categories.selected().to_string(),
            focus_secs: self.elapsed_focus_secs,
            break_secs: self.elapsed_break_secs,
            completed_todos: session.completed_todos.len(),
            at: session.date,
        };

        let mut history = self.history.clone();
        history.push(session);
        persisted::save(&self.store, SESSIONS_KEY, &history)?;
        self.history = history;

        tracing::info!(
            category = self.categories.selected(),
            focus_secs = self.elapsed_focus_secs,
            break_secs = self.elapsed_break_secs,
            "session saved"
        );

        self.elapsed_focus_secs = 0;
        self.elapsed_break_secs = 0;
        self.mode = FocusMode::Focusing;
        self.phase = SessionPhase::Idle;
        self.commit_todos(TodoStore::new())?;

        Ok(Some(event))
    }

    /// Leave the completion step without archiving.
    ///
    /// The counters are kept, so the next session continues from them.
    pub fn abandon(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Ending {
            return None;
        }
        self.phase = SessionPhase::Idle;
        tracing::debug!(
            focus_secs = self.elapsed_focus_secs,
            break_secs = self.elapsed_break_secs,
            "session abandoned"
        );
        Some(Event::SessionAbandoned {
            focus_secs: self.elapsed_focus_secs,
            break_secs: self.elapsed_break_secs,
            at: Utc::now(),
        })
    }

    // ── Categories ───────────────────────────────────────────────────

    /// Add and select a category, then persist the list.
    ///
    /// # Errors
    /// Returns an error if the list cannot be persisted; nothing changes then.
    pub fn add_category(&mut self, name: &str) -> Result<Option<Event>> {
        let mut categories = self.categories.clone();
        let Some(added) = categories.add(name).map(str::to_string) else {
            return Ok(None);
        };
        persisted::save(&self.store, CATEGORIES_KEY, categories.as_slice())?;
        self.categories = categories;
        tracing::debug!(category = %added, "category added");
        Ok(Some(Event::CategoryAdded {
            name: added,
            at: Utc::now(),
        }))
    }

    pub fn select_category(&mut self, name: &str) -> Option<Event> {
        let selected = self.categories.select(name)?.to_string();
        Some(Event::CategorySelected {
            name: selected,
            at: Utc::now(),
        })
    }

    /// Re-read the persisted category list, keeping the selection if it
    /// still exists and otherwise falling back to the first category.
    pub fn reload_categories(&mut self) {
        let persisted_categories: Vec<String> =
            persisted::load_or_default(&self.store, CATEGORIES_KEY);
        if !persisted_categories.is_empty() {
            self.categories.reconcile(persisted_categories);
        }
    }

    // ── Todos ────────────────────────────────────────────────────────

    /// Add a todo under the selected category.
    ///
    /// # Errors
    /// Returns an error if the todo list cannot be persisted.
    pub fn add_todo(&mut self, title: &str) -> Result<Option<Event>> {
        let mut todos = self.todos.clone();
        let Some(todo) = todos.add(title, self.categories.selected()).cloned() else {
            return Ok(None);
        };
        self.commit_todos(todos)?;
        Ok(Some(Event::TodoAdded {
            id: todo.id,
            title: todo.title,
            category: todo.category,
            at: Utc::now(),
        }))
    }

    /// # Errors
    /// Returns an error if the todo list cannot be persisted.
    pub fn toggle_completion(&mut self, id: Uuid) -> Result<Option<Event>> {
        let mut todos = self.todos.clone();
        let Some(completed) = todos.toggle(id) else {
            return Ok(None);
        };
        self.commit_todos(todos)?;
        Ok(Some(Event::TodoToggled {
            id,
            completed,
            at: Utc::now(),
        }))
    }

    /// # Errors
    /// Returns an error if the todo list cannot be persisted.
    pub fn remove_todo(&mut self, id: Uuid) -> Result<Option<Event>> {
        let mut todos = self.todos.clone();
        let Some(removed) = todos.remove(id) else {
            return Ok(None);
        };
        self.commit_todos(todos)?;
        Ok(Some(Event::TodoRemoved {
            id,
            title: removed.title,
            at: Utc::now(),
        }))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn commit_todos(&mut self, todos: TodoStore) -> Result<()> {
        persisted::save(&self.store, TODOS_KEY, &todos)?;
        self.todos = todos;
        Ok(())
    }
}

fn migrate_legacy_completion<S: KeyValueStore>(store: &S, todos: &mut TodoStore) {
    match persisted::load::<Vec<Uuid>, _>(store, LEGACY_COMPLETED_IDS_KEY) {
        Ok(None) => return,
        Ok(Some(ids)) => {
            let ids: HashSet<Uuid> = ids.into_iter().collect();
            let marked = todos.mark_completed(&ids);
            if marked > 0 {
                if let Err(e) = persisted::save(store, TODOS_KEY, &*todos) {
                    tracing::warn!(error = %e, "could not persist migrated completion flags");
                    return;
                }
            }
            tracing::info!(marked, "migrated legacy completed todo ids");
        }
        Err(e) => {
            tracing::warn!(error = %e, "dropping unreadable legacy completed todo ids");
        }
    }
    if let Err(e) = store.remove(LEGACY_COMPLETED_IDS_KEY) {
        tracing::warn!(error = %e, "could not remove legacy completed todo ids");
    }
}
