use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Archived record of one finished focus session.
///
/// Todo titles are copied by value; editing a todo later does not touch
/// history. Times are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub category_times: BTreeMap<String, u64>,
    pub break_time: u64,
    pub todos: Vec<String>,
    pub completed_todos: Vec<String>,
}

impl FocusSession {
    /// Record `focus_secs` against a single category, dated now.
    pub fn new(
        category: &str,
        focus_secs: u64,
        break_secs: u64,
        todos: Vec<String>,
        completed_todos: Vec<String>,
    ) -> Self {
        let mut category_times = BTreeMap::new();
        category_times.insert(category.to_string(), focus_secs);
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            category_times,
            break_time: break_secs,
            todos,
            completed_todos,
        }
    }

    /// Focus seconds summed over every category.
    pub fn focus_time(&self) -> u64 {
        self.category_times.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_single_category() {
        let s = FocusSession::new("work", 42, 7, vec!["a".into()], vec![]);
        assert_eq!(s.category_times.len(), 1);
        assert_eq!(s.category_times["work"], 42);
        assert_eq!(s.break_time, 7);
        assert_eq!(s.focus_time(), 42);
    }

    #[test]
    fn uses_camel_case_field_names() {
        let s = FocusSession::new("work", 1, 2, vec![], vec!["done".into()]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["categoryTimes"]["work"], 1);
        assert_eq!(json["breakTime"], 2);
        assert_eq!(json["completedTodos"][0], "done");
        assert!(json.get("category_times").is_none());
    }

    #[test]
    fn sequence_roundtrips() {
        let sessions = vec![
            FocusSession::new("work", 30, 5, vec!["t1".into(), "t2".into()], vec!["t1".into()]),
            FocusSession::new("study", 45, 0, vec![], vec![]),
        ];
        let encoded = serde_json::to_string(&sessions).unwrap();
        let decoded: Vec<FocusSession> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, sessions);
    }
}
