//! Ordered category list with a single selected entry.
//!
//! Labels are stored trimmed and lowercased, so membership checks after
//! normalization are case-insensitive in effect.

use serde::Serialize;

/// Trim and lowercase a category label.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Categories in insertion order plus the selected one.
///
/// Whenever the list is non-empty, `selected` is one of its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryList {
    categories: Vec<String>,
    selected: String,
}

impl CategoryList {
    /// Build a list from raw labels. Empty labels and duplicates are dropped.
    /// The first remaining label is selected.
    pub fn new<I, T>(labels: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut categories: Vec<String> = Vec::new();
        for label in labels {
            let label = normalize(label.as_ref());
            if !label.is_empty() && !categories.contains(&label) {
                categories.push(label);
            }
        }
        let selected = categories.first().cloned().unwrap_or_default();
        Self {
            categories,
            selected,
        }
    }

    /// Select `preferred` if it is in the list; otherwise keep the current pick.
    pub fn with_selection(mut self, preferred: &str) -> Self {
        self.select(preferred);
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.categories
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = normalize(name);
        self.categories.contains(&name)
    }

    /// The selected label, empty only when the list is empty.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Append a new label and select it.
    ///
    /// Returns the stored (normalized) label, or `None` when the label is
    /// blank or already present.
    pub fn add(&mut self, name: &str) -> Option<&str> {
        let name = normalize(name);
        if name.is_empty() || self.categories.contains(&name) {
            return None;
        }
        self.categories.push(name.clone());
        self.selected = name;
        Some(self.selected.as_str())
    }

    /// Select an existing label, matched case-insensitively.
    pub fn select(&mut self, name: &str) -> Option<&str> {
        let name = normalize(name);
        if !self.categories.contains(&name) {
            return None;
        }
        self.selected = name;
        Some(self.selected.as_str())
    }

    /// Replace the list with `labels`, keeping the selection when it survives
    /// and falling back to the first label when it does not.
    pub fn reconcile<I, T>(&mut self, labels: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let previous = std::mem::take(&mut self.selected);
        *self = Self::new(labels);
        self.select(&previous);
    }
}

impl<'a> IntoIterator for &'a CategoryList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_and_dedupes() {
        let list = CategoryList::new(["Work", " study ", "WORK", "", "   "]);
        assert_eq!(list.as_slice(), ["work", "study"]);
        assert_eq!(list.selected(), "work");
    }

    #[test]
    fn add_is_case_insensitive() {
        let mut list = CategoryList::default();
        assert_eq!(list.add("Work"), Some("work"));
        assert_eq!(list.add("work"), None);
        assert_eq!(list.add("  WORK  "), None);
        assert_eq!(list.as_slice(), ["work"]);
    }

    #[test]
    fn add_rejects_blank() {
        let mut list = CategoryList::new(["work"]);
        assert_eq!(list.add(""), None);
        assert_eq!(list.add(" \t\n"), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn add_selects_new_category() {
        let mut list = CategoryList::new(["work", "study"]);
        list.add("Reading");
        assert_eq!(list.selected(), "reading");
        assert_eq!(list.as_slice().last().map(String::as_str), Some("reading"));
    }

    #[test]
    fn select_unknown_keeps_current() {
        let mut list = CategoryList::new(["work", "study"]);
        assert_eq!(list.select("Study"), Some("study"));
        assert_eq!(list.select("gardening"), None);
        assert_eq!(list.selected(), "study");
    }

    #[test]
    fn reconcile_falls_back_to_first() {
        let mut list = CategoryList::new(["work", "study"]).with_selection("study");
        list.reconcile(["exercise", "work"]);
        assert_eq!(list.selected(), "exercise");

        list.select("work");
        list.reconcile(["exercise", "work", "music"]);
        assert_eq!(list.selected(), "work");
    }

    #[test]
    fn empty_list_has_empty_selection() {
        let mut list = CategoryList::new(["work"]);
        list.reconcile(Vec::<String>::new());
        assert!(list.is_empty());
        assert_eq!(list.selected(), "");
    }
}
