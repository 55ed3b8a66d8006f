use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::focus::{FocusMode, SessionPhase};

/// Every state change in the engine produces an Event.
/// Presentation layers print or render them; nothing is emitted on a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        category: String,
        at: DateTime<Utc>,
    },
    BreakToggled {
        mode: FocusMode,
        focus_secs: u64,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    SessionEnded {
        focus_secs: u64,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    SessionSaved {
        session_id: Uuid,
        category: String,
        focus_secs: u64,
        break_secs: u64,
        completed_todos: usize,
        at: DateTime<Utc>,
    },
    /// Left the summary step without saving. Counters are kept.
    SessionAbandoned {
        focus_secs: u64,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    CategoryAdded {
        name: String,
        at: DateTime<Utc>,
    },
    CategorySelected {
        name: String,
        at: DateTime<Utc>,
    },
    TodoAdded {
        id: Uuid,
        title: String,
        category: String,
        at: DateTime<Utc>,
    },
    TodoToggled {
        id: Uuid,
        completed: bool,
        at: DateTime<Utc>,
    },
    TodoRemoved {
        id: Uuid,
        title: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        mode: FocusMode,
        focus_secs: u64,
        break_secs: u64,
        selected_category: String,
        todo_count: usize,
        at: DateTime<Utc>,
    },
}
