//! Export selection tracking
//!
//! Result pages are replaced wholesale on every pagination, re-sort or
//! display change, but the set of items the user ticked for export must
//! survive those refreshes. `SelectionTracker` holds that set for the lifetime
//! of one search session and tells the caller which of the newly visible items
//! to show as checked.
//!
//! ```text
//! page 1 visible: [10, 11, 12]   toggle 11        selected {11}
//! page 2 visible: [13, 14, 15]   toggle 14        selected {11, 14}
//! page 1 visible: [10, 11, 12]   reapply -> [11]
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a search result item
///
/// The search controller uses numeric ids but treats them as opaque strings on
/// the wire; both forms deserialize.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from its textual form
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    /// Textual form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self::from(n),
            Raw::Text(s) => Self::new(s),
        })
    }
}

/// Set of items ticked for export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: BTreeSet<ItemId>,
}

impl SelectionTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one item; returns whether it is now selected
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Replace the whole selection
    ///
    /// Used with the server's full list of matching ids when "select all" is
    /// confirmed, or with an empty list to deselect everything.
    pub fn set_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.selected = ids.into_iter().collect();
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Items of `visible` that are selected, in `visible` order
    #[must_use]
    pub fn reapply(&self, visible: &[ItemId]) -> Vec<ItemId> {
        visible
            .iter()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect()
    }

    /// Whether an item is selected
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected items
    #[must_use]
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order
    #[must_use]
    pub fn ids(&self) -> Vec<ItemId> {
        self.selected.iter().cloned().collect()
    }

    /// Label for the selected-results control
    #[must_use]
    pub fn label(&self) -> String {
        format!("Selected Results ({})", self.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|s| ItemId::from(*s)).collect()
    }

    #[test]
    fn test_toggle_is_involution() {
        let mut tracker = SelectionTracker::new();
        tracker.set_all(ids(&["1", "2"]));
        let before = tracker.clone();

        assert!(tracker.toggle("3".into()));
        assert!(!tracker.toggle("3".into()));
        assert_eq!(tracker, before);

        assert!(!tracker.toggle("1".into()));
        assert!(tracker.toggle("1".into()));
        assert_eq!(tracker, before);
    }

    #[test]
    fn test_reapply_is_subset_of_visible() {
        let mut tracker = SelectionTracker::new();
        tracker.set_all(ids(&["11", "14", "99"]));

        let visible = ids(&["14", "10", "11", "12"]);
        let checked = tracker.reapply(&visible);

        assert_eq!(checked, ids(&["14", "11"]));
        assert!(checked.iter().all(|id| visible.contains(id)));
        assert_eq!(tracker.count(), 3);
    }

    #[test]
    fn test_selection_survives_page_changes() {
        let mut tracker = SelectionTracker::new();
        let page_one = ids(&["10", "11", "12"]);
        let page_two = ids(&["13", "14", "15"]);

        tracker.toggle("11".into());
        assert_eq!(tracker.reapply(&page_two), Vec::<ItemId>::new());
        tracker.toggle("14".into());

        assert_eq!(tracker.reapply(&page_one), ids(&["11"]));
        assert_eq!(tracker.reapply(&page_two), ids(&["14"]));
        assert_eq!(tracker.label(), "Selected Results (2)");
    }

    #[test]
    fn test_set_all_replaces_and_clears() {
        let mut tracker = SelectionTracker::new();
        tracker.toggle("1".into());
        tracker.set_all(ids(&["5", "6"]));
        assert!(!tracker.contains(&"1".into()));
        assert_eq!(tracker.ids(), ids(&["5", "6"]));

        tracker.set_all(Vec::new());
        assert!(tracker.is_empty());

        tracker.toggle("7".into());
        tracker.clear();
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn test_item_id_deserializes_numbers_and_strings() {
        let parsed: Vec<ItemId> = serde_json::from_str(r#"[101, "102", " 103 "]"#).unwrap();
        assert_eq!(parsed, ids(&["101", "102", "103"]));
        assert_eq!(serde_json::to_string(&parsed[0]).unwrap(), r#""101""#);
    }
}
