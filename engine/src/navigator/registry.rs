//! Tag-indexed registry of scene objects
//!
//! Objects are annotated with free-text tags when they register. The
//! registry keeps one [`TrackedEntry`] per handle plus an inverted
//! [`TagIndex`], and prunes entries whose object was destroyed in the host
//! world the next time it walks over them.

use super::entry::{TagIndex, TrackedEntry};
use super::error::{NavigatorError, NavigatorResult};
use super::events::{ChangeCallback, ChangeListeners, SubscriptionId};
use super::filter::{sort_for_display, ActiveSelection, MatchMode};
use super::handle::{Handle, HostWorld};
use super::selection::SELECTION_SEPARATOR;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, trace, warn};

/// Operations every navigator backend provides
///
/// The editor only talks to this trait, so alternative indexing strategies
/// and test doubles can be swapped in through the locator.
pub trait NavigatorProvider<H: Handle> {
    /// Register `handle` with `tags`, merging into an existing entry
    fn register(
        &mut self,
        host: &dyn HostWorld<H>,
        handle: H,
        tags: &[&str],
    ) -> NavigatorResult<()>;

    /// Register `handle` with a single tag
    fn register_tag(
        &mut self,
        host: &dyn HostWorld<H>,
        handle: H,
        tag: &str,
    ) -> NavigatorResult<()> {
        self.register(host, handle, &[tag])
    }

    /// Forget `handle`. Returns false if it was not registered.
    fn deregister(&mut self, handle: H) -> bool;

    /// Snapshot of tag reference counts
    fn tag_counts(&self) -> BTreeMap<String, usize>;

    /// All known tags, sorted
    fn all_tags(&self) -> Vec<String>;

    /// Whether `handle` is currently tracked
    fn contains(&self, handle: H) -> bool;

    /// Number of tracked entries, including ones not yet reconciled
    fn len(&self) -> usize;

    /// Check if nothing is tracked
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk every live entry
    ///
    /// Entries whose handle died are skipped and removed once the returned
    /// iterator is dropped.
    fn entries<'a>(
        &'a mut self,
        host: &'a dyn HostWorld<H>,
    ) -> Box<dyn Iterator<Item = TrackedEntry<H>> + 'a>;

    /// Live entries holding `tag`, ordered by display name
    fn entries_with_tag(&mut self, host: &dyn HostWorld<H>, tag: &str) -> Vec<TrackedEntry<H>> {
        let selection = ActiveSelection::new([tag.to_string()], MatchMode::MatchAny);
        self.query(host, &selection)
    }

    /// Live entries passing `selection`, ordered by display name
    fn query(
        &mut self,
        host: &dyn HostWorld<H>,
        selection: &ActiveSelection,
    ) -> Vec<TrackedEntry<H>>;

    /// Attach a callback fired whenever entries or tags change
    fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId;

    /// Detach a callback. Returns false if the id was unknown.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Validate a tag list before any mutation happens
fn validate_tags(tags: &[&str]) -> NavigatorResult<()> {
    if tags.is_empty() {
        return Err(NavigatorError::NoTags);
    }
    for tag in tags {
        if tag.is_empty() {
            return Err(NavigatorError::EmptyTag);
        }
        if tag.contains(SELECTION_SEPARATOR) {
            return Err(NavigatorError::ReservedSeparator(tag.to_string()));
        }
    }
    Ok(())
}

/// Default navigator backend with an inverted tag index
pub struct TagRegistry<H: Handle> {
    entries: HashMap<H, TrackedEntry<H>>,
    index: TagIndex<H>,
    listeners: ChangeListeners,
}

impl<H: Handle> Default for TagRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handle> std::fmt::Debug for TagRegistry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRegistry")
            .field("entries", &self.entries.len())
            .field("tags", &self.index.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<H: Handle> TagRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            index: TagIndex::new(),
            listeners: ChangeListeners::new(),
        }
    }

    /// Look up the entry for `handle` without checking liveness
    pub fn get(&self, handle: H) -> Option<&TrackedEntry<H>> {
        self.entries.get(&handle)
    }

    /// Number of entries holding `tag`
    pub fn tag_count(&self, tag: &str) -> usize {
        self.index.count(tag)
    }

    /// Remove an entry and release its tags, without notifying
    fn remove_entry(&mut self, handle: H) -> bool {
        let Some(entry) = self.entries.remove(&handle) else {
            return false;
        };
        for tag in &entry.tags {
            self.index.remove(tag, handle);
        }
        trace!(handle = ?handle, name = %entry.display_name, "Removed tracked entry");
        true
    }

    /// Drop entries whose objects were destroyed, notifying once
    fn remove_stale(&mut self, stale: &[H]) {
        let removed = stale
            .iter()
            .filter(|&&handle| self.remove_entry(handle))
            .count();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "Reconciled destroyed entries");
            self.listeners.notify();
        }
    }

    /// Check that the tag index matches the tracked entries
    pub fn validate_consistency(&self) -> bool {
        let mut expected: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in self.entries.values() {
            for tag in &entry.tags {
                *expected.entry(tag.as_str()).or_default() += 1;
                let indexed = self
                    .index
                    .handles(tag)
                    .is_some_and(|set| set.contains(&entry.handle));
                if !indexed {
                    warn!(handle = ?entry.handle, tag = %tag, "Entry tag missing from index");
                    return false;
                }
            }
        }

        let consistent = expected.len() == self.index.len()
            && expected
                .iter()
                .all(|(tag, count)| self.index.count(tag) == *count);
        if !consistent {
            warn!("Navigator tag index inconsistency detected");
        }
        consistent
    }
}

impl<H: Handle> NavigatorProvider<H> for TagRegistry<H> {
    fn register(
        &mut self,
        host: &dyn HostWorld<H>,
        handle: H,
        tags: &[&str],
    ) -> NavigatorResult<()> {
        validate_tags(tags)?;

        if !self.entries.contains_key(&handle) {
            let Some(display_name) = host.display_name(handle) else {
                debug!(handle = ?handle, "Ignoring registration of destroyed object");
                return Ok(());
            };
            self.entries.insert(
                handle,
                TrackedEntry::new(handle, display_name, std::iter::empty()),
            );
        }

        let mut added = Vec::new();
        if let Some(entry) = self.entries.get_mut(&handle) {
            for tag in tags {
                if entry.tags.insert(tag.to_string()) {
                    self.index.add(tag, handle);
                    added.push(*tag);
                }
            }
        }

        if added.is_empty() {
            trace!(handle = ?handle, "Registration added no new tags");
            return Ok(());
        }

        debug!(handle = ?handle, tags = ?added, "Registered object");
        self.listeners.notify();
        Ok(())
    }

    fn deregister(&mut self, handle: H) -> bool {
        if !self.remove_entry(handle) {
            trace!(handle = ?handle, "Deregister of unknown object ignored");
            return false;
        }
        debug!(handle = ?handle, "Deregistered object");
        self.listeners.notify();
        true
    }

    fn tag_counts(&self) -> BTreeMap<String, usize> {
        self.index.counts()
    }

    fn all_tags(&self) -> Vec<String> {
        self.index.tags().map(str::to_string).collect()
    }

    fn contains(&self, handle: H) -> bool {
        self.entries.contains_key(&handle)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries<'a>(
        &'a mut self,
        host: &'a dyn HostWorld<H>,
    ) -> Box<dyn Iterator<Item = TrackedEntry<H>> + 'a> {
        Box::new(Entries::new(self, host))
    }

    fn query(
        &mut self,
        host: &dyn HostWorld<H>,
        selection: &ActiveSelection,
    ) -> Vec<TrackedEntry<H>> {
        if selection.is_empty() {
            return Vec::new();
        }

        let candidates: BTreeSet<H> = match selection.mode {
            MatchMode::MatchAny => selection
                .tags
                .iter()
                .filter_map(|tag| self.index.handles(tag))
                .flatten()
                .copied()
                .collect(),
            MatchMode::MatchAll => {
                let sets: Option<Vec<_>> = selection
                    .tags
                    .iter()
                    .map(|tag| self.index.handles(tag))
                    .collect();
                match sets {
                    // A tag nothing holds can never be satisfied
                    None => BTreeSet::new(),
                    Some(mut sets) => {
                        sets.sort_by_key(|set| set.len());
                        let (smallest, rest) = sets.split_at(1);
                        smallest[0]
                            .iter()
                            .filter(|&handle| rest.iter().all(|set| set.contains(handle)))
                            .copied()
                            .collect()
                    }
                }
            }
        };

        let mut stale = Vec::new();
        let mut result = Vec::with_capacity(candidates.len());
        for handle in candidates {
            if !host.is_alive(handle) {
                stale.push(handle);
                continue;
            }
            if let Some(entry) = self.entries.get(&handle) {
                result.push(entry.clone());
            }
        }
        self.remove_stale(&stale);

        sort_for_display(&mut result);
        trace!(
            active = selection.tags.len(),
            mode = ?selection.mode,
            matched = result.len(),
            "Filtered navigator entries"
        );
        result
    }

    fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
        self.listeners.subscribe(callback)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

/// Enumeration over a [`TagRegistry`] with deferred reconciliation
///
/// Handles found dead during the walk are collected and removed when the
/// iterator is dropped, so the backing map is never mutated mid-iteration.
/// The mutable borrow held by this iterator rules out any other access to
/// the registry until the walk ends.
pub struct Entries<'a, H: Handle> {
    registry: &'a mut TagRegistry<H>,
    host: &'a dyn HostWorld<H>,
    pending: std::vec::IntoIter<H>,
    stale: Vec<H>,
}

impl<'a, H: Handle> Entries<'a, H> {
    fn new(registry: &'a mut TagRegistry<H>, host: &'a dyn HostWorld<H>) -> Self {
        let mut handles: Vec<H> = registry.entries.keys().copied().collect();
        handles.sort();
        Self {
            registry,
            host,
            pending: handles.into_iter(),
            stale: Vec::new(),
        }
    }
}

impl<H: Handle> Iterator for Entries<'_, H> {
    type Item = TrackedEntry<H>;

    fn next(&mut self) -> Option<Self::Item> {
        for handle in self.pending.by_ref() {
            if !self.host.is_alive(handle) {
                self.stale.push(handle);
                continue;
            }
            if let Some(entry) = self.registry.entries.get(&handle) {
                return Some(entry.clone());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.pending.len()))
    }
}

impl<H: Handle> Drop for Entries<'_, H> {
    fn drop(&mut self) {
        if !self.stale.is_empty() {
            let stale = std::mem::take(&mut self.stale);
            self.registry.remove_stale(&stale);
        }
    }
}
