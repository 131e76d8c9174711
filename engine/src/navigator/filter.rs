//! Tag filtering over tracked entries
//!
//! Filtering is a pure function of the entries, the active tags and the
//! match mode. An empty selection matches nothing in either mode so an
//! unfiltered panel stays empty instead of listing the whole world.

use super::entry::TrackedEntry;
use super::error::{NavigatorError, NavigatorResult};
use super::handle::Handle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the active tags are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    /// Entry holds at least one active tag
    #[default]
    #[serde(rename = "any")]
    MatchAny,
    /// Entry holds every active tag
    #[serde(rename = "all")]
    MatchAll,
}

impl MatchMode {
    /// Map a UI combo index to a mode
    pub fn from_index(index: i32) -> NavigatorResult<Self> {
        match index {
            0 => Ok(MatchMode::MatchAny),
            1 => Ok(MatchMode::MatchAll),
            other => Err(NavigatorError::UnsupportedMatchMode(other)),
        }
    }

    /// UI combo index of this mode
    pub fn index(self) -> i32 {
        match self {
            MatchMode::MatchAny => 0,
            MatchMode::MatchAll => 1,
        }
    }

    /// Short label for display
    pub fn label(self) -> &'static str {
        match self {
            MatchMode::MatchAny => "Match any",
            MatchMode::MatchAll => "Match all",
        }
    }
}

/// Tags currently chosen as filter criteria and how they combine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSelection {
    pub tags: BTreeSet<String>,
    pub mode: MatchMode,
}

impl ActiveSelection {
    /// Create a selection from a set of tags
    pub fn new(tags: impl IntoIterator<Item = String>, mode: MatchMode) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            mode,
        }
    }

    /// Flip `tag` in or out of the selection. Returns whether it is now active.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_string());
            true
        }
    }

    /// Set whether `tag` is active. Returns true if the selection changed.
    pub fn set_active(&mut self, tag: &str, active: bool) -> bool {
        if active {
            self.tags.insert(tag.to_string())
        } else {
            self.tags.remove(tag)
        }
    }

    /// Whether `tag` is active
    pub fn is_active(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Deactivate every tag
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Check if no tag is active
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether `entry` passes this selection
    pub fn matches<H: Handle>(&self, entry: &TrackedEntry<H>) -> bool {
        if self.tags.is_empty() {
            return false;
        }
        match self.mode {
            MatchMode::MatchAny => entry.has_any(&self.tags),
            MatchMode::MatchAll => entry.has_all(&self.tags),
        }
    }
}

/// Sort entries by display name using ordinal comparison
pub fn sort_for_display<H: Handle>(entries: &mut [TrackedEntry<H>]) {
    entries.sort_by(|a, b| a.display_order(b));
}

/// Filter `entries` against `selection`, ordered by display name
pub fn filter_entries<'a, H, I>(entries: I, selection: &ActiveSelection) -> Vec<TrackedEntry<H>>
where
    H: Handle,
    I: IntoIterator<Item = &'a TrackedEntry<H>>,
{
    if selection.is_empty() {
        return Vec::new();
    }

    let mut result: Vec<TrackedEntry<H>> = entries
        .into_iter()
        .filter(|entry| selection.matches(entry))
        .cloned()
        .collect();
    sort_for_display(&mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(handle: u32, name: &str, tags: &[&str]) -> TrackedEntry<u32> {
        TrackedEntry::new(handle, name, tags.iter().map(|t| t.to_string()))
    }

    fn selection(tags: &[&str], mode: MatchMode) -> ActiveSelection {
        ActiveSelection::new(tags.iter().map(|t| t.to_string()), mode)
    }

    fn names(entries: &[TrackedEntry<u32>]) -> Vec<&str> {
        entries.iter().map(|e| e.display_name.as_str()).collect()
    }

    #[test]
    fn test_match_any() {
        let entries = vec![entry(1, "A", &["x", "y"])];

        let result = filter_entries(&entries, &selection(&["y"], MatchMode::MatchAny));
        assert_eq!(names(&result), vec!["A"]);

        let result = filter_entries(&entries, &selection(&["z"], MatchMode::MatchAny));
        assert!(result.is_empty());
    }

    #[test]
    fn test_match_all() {
        let both = vec![entry(1, "A", &["x", "y"])];
        let result = filter_entries(&both, &selection(&["x", "y"], MatchMode::MatchAll));
        assert_eq!(names(&result), vec!["A"]);

        let one = vec![entry(1, "A", &["x"])];
        let result = filter_entries(&one, &selection(&["x", "y"], MatchMode::MatchAll));
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_selection_matches_nothing() {
        let entries = vec![entry(1, "A", &["x"])];

        assert!(filter_entries(&entries, &selection(&[], MatchMode::MatchAny)).is_empty());
        assert!(filter_entries(&entries, &selection(&[], MatchMode::MatchAll)).is_empty());
    }

    #[test]
    fn test_result_sorted_by_name() {
        let entries = vec![entry(1, "Zeta", &["t"]), entry(2, "Alpha", &["t"])];

        let result = filter_entries(&entries, &selection(&["t"], MatchMode::MatchAny));
        assert_eq!(names(&result), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_toggle_and_set_active() {
        let mut selection = ActiveSelection::default();
        assert!(selection.toggle("enemy"));
        assert!(selection.is_active("enemy"));
        assert!(!selection.toggle("enemy"));
        assert!(selection.is_empty());

        assert!(selection.set_active("boss", true));
        assert!(!selection.set_active("boss", true));
        assert!(selection.set_active("boss", false));
        assert!(!selection.set_active("boss", false));
    }

    #[test]
    fn test_match_mode_index() {
        assert_eq!(MatchMode::from_index(0), Ok(MatchMode::MatchAny));
        assert_eq!(MatchMode::from_index(1), Ok(MatchMode::MatchAll));
        assert_eq!(
            MatchMode::from_index(5),
            Err(NavigatorError::UnsupportedMatchMode(5))
        );
        assert_eq!(MatchMode::MatchAll.index(), 1);
    }

    #[test]
    fn test_match_mode_serde() {
        let json = serde_json::to_string(&MatchMode::MatchAll).unwrap();
        assert_eq!(json, "\"all\"");

        let mode: MatchMode = serde_json::from_str("\"any\"").unwrap();
        assert_eq!(mode, MatchMode::MatchAny);
    }
}
