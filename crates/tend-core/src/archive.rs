//! Read-only aggregation over archived sessions and todos.
//!
//! Everything here is a pure fold; recomputing on every read is fine.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use indexmap::IndexMap;
use serde::Serialize;

use crate::focus::FocusSession;
use crate::todo::Todo;

/// Sum of every category time across `sessions`, in seconds.
pub fn total_focus_time(sessions: &[FocusSession]) -> u64 {
    sessions.iter().map(FocusSession::focus_time).sum()
}

/// Sum of break time across `sessions`, in seconds.
pub fn total_break_time(sessions: &[FocusSession]) -> u64 {
    sessions.iter().map(|s| s.break_time).sum()
}

/// Focus seconds per category across `sessions`.
pub fn focus_time_by_category(sessions: &[FocusSession]) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for (category, secs) in sessions.iter().flat_map(|s| &s.category_times) {
        *totals.entry(category.clone()).or_insert(0) += secs;
    }
    totals
}

/// Partition todos by category.
///
/// Groups appear in the order their category is first seen and keep the
/// relative order of their todos.
pub fn group_by_category<'a, I>(todos: I) -> IndexMap<String, Vec<&'a Todo>>
where
    I: IntoIterator<Item = &'a Todo>,
{
    let mut groups: IndexMap<String, Vec<&'a Todo>> = IndexMap::new();
    for todo in todos {
        groups.entry(todo.category.clone()).or_default().push(todo);
    }
    groups
}

/// Sessions dated on `day` as seen from `tz`.
pub fn sessions_on<'a, Tz: TimeZone>(
    sessions: &'a [FocusSession],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a FocusSession> {
    sessions
        .iter()
        .filter(|s| s.date.with_timezone(tz).date_naive() == day)
        .collect()
}

/// Render seconds as `MM:SS`. Minutes keep counting past 59.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Aggregate view over the whole history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub session_count: usize,
    pub total_focus_secs: u64,
    pub total_break_secs: u64,
    pub completed_todos: usize,
    pub focus_by_category: BTreeMap<String, u64>,
}

impl ArchiveSummary {
    pub fn from_sessions(sessions: &[FocusSession]) -> Self {
        Self {
            session_count: sessions.len(),
            total_focus_secs: total_focus_time(sessions),
            total_break_secs: total_break_time(sessions),
            completed_todos: sessions.iter().map(|s| s.completed_todos.len()).sum(),
            focus_by_category: focus_time_by_category(sessions),
        }
    }
}
