//! Tracked entries and the tag index derived from them

use super::handle::Handle;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Tag used by the single-tag registration helpers when none is given
pub const DEFAULT_TAG: &str = "(default)";

/// A registered object together with the tags it was annotated with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry<H: Handle> {
    /// Identity of the object in the host world
    pub handle: H,
    /// Name captured at registration time
    pub display_name: String,
    /// Tags held by this entry, never empty
    pub tags: BTreeSet<String>,
}

impl<H: Handle> TrackedEntry<H> {
    /// Create a new entry
    pub fn new(
        handle: H,
        display_name: impl Into<String>,
        tags: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            handle,
            display_name: display_name.into(),
            tags: tags.into_iter().collect(),
        }
    }

    /// Whether this entry holds `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether this entry holds at least one of `tags`
    pub fn has_any(&self, tags: &BTreeSet<String>) -> bool {
        tags.iter().any(|tag| self.tags.contains(tag))
    }

    /// Whether this entry holds every one of `tags`
    pub fn has_all(&self, tags: &BTreeSet<String>) -> bool {
        tags.is_subset(&self.tags)
    }

    /// Ordinal ordering by display name, then by handle for equal names
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.display_name
            .as_bytes()
            .cmp(other.display_name.as_bytes())
            .then_with(|| self.handle.cmp(&other.handle))
    }
}

/// Inverted index from tag to the handles holding it
///
/// The reference count of a tag is the number of handles in its set, so a
/// tag is present exactly while at least one entry holds it.
#[derive(Debug, Clone)]
pub struct TagIndex<H: Handle> {
    holders: BTreeMap<String, HashSet<H>>,
}

impl<H: Handle> Default for TagIndex<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handle> TagIndex<H> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            holders: BTreeMap::new(),
        }
    }

    /// Record that `handle` holds `tag`. Returns false if it already did.
    pub fn add(&mut self, tag: &str, handle: H) -> bool {
        match self.holders.get_mut(tag) {
            Some(set) => set.insert(handle),
            None => {
                self.holders
                    .insert(tag.to_string(), HashSet::from([handle]));
                true
            }
        }
    }

    /// Record that `handle` no longer holds `tag`, dropping the tag when
    /// nothing holds it anymore. Returns false if nothing changed.
    pub fn remove(&mut self, tag: &str, handle: H) -> bool {
        let Some(set) = self.holders.get_mut(tag) else {
            return false;
        };
        let removed = set.remove(&handle);
        if set.is_empty() {
            self.holders.remove(tag);
        }
        removed
    }

    /// Number of entries holding `tag`
    pub fn count(&self, tag: &str) -> usize {
        self.holders.get(tag).map_or(0, HashSet::len)
    }

    /// Whether any entry holds `tag`
    pub fn contains(&self, tag: &str) -> bool {
        self.holders.contains_key(tag)
    }

    /// Handles holding `tag`
    pub fn handles(&self, tag: &str) -> Option<&HashSet<H>> {
        self.holders.get(tag)
    }

    /// Snapshot of tag reference counts
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.holders
            .iter()
            .map(|(tag, set)| (tag.clone(), set.len()))
            .collect()
    }

    /// All known tags in sorted order
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.holders.keys().map(String::as_str)
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    /// Check if no tags are indexed
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    /// Remove every tag
    pub fn clear(&mut self) {
        self.holders.clear();
    }
}
