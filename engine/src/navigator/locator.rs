//! Holder of the active navigator provider
//!
//! The locator is created at the composition root and passed to whatever
//! needs the navigator. Dependents subscribe to the locator rather than to
//! a provider directly, so swapping providers never loses them.

use super::entry::TrackedEntry;
use super::error::{NavigatorError, NavigatorResult};
use super::events::{ChangeCallback, ChangeListeners, SubscriptionId};
use super::filter::ActiveSelection;
use super::handle::{Handle, HostWorld};
use super::registry::{NavigatorProvider, TagRegistry};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};

/// A navigator provider behind a trait object
pub type DynProvider<H> = dyn NavigatorProvider<H>;

/// Shared, swappable provider
pub type SharedProvider<H> = Rc<RefCell<DynProvider<H>>>;

/// Owns the active provider and relays its change notifications
///
/// Access to the provider goes through `RefCell::try_borrow(_mut)`, so a
/// callback that tries to mutate the navigator while it is already in use
/// gets [`NavigatorError::Reentrant`] instead of corrupting state. The
/// locator is not `Send`; all navigator work stays on one thread.
pub struct NavigatorLocator<H: Handle> {
    provider: SharedProvider<H>,
    relay: SubscriptionId,
    collection_changed: Rc<RefCell<ChangeListeners>>,
    provider_changed: ChangeListeners,
}

impl<H: Handle> Default for NavigatorLocator<H> {
    fn default() -> Self {
        Self::new(TagRegistry::new())
    }
}

impl<H: Handle> NavigatorLocator<H> {
    /// Create a locator around `provider`
    pub fn new(mut provider: impl NavigatorProvider<H> + 'static) -> Self {
        let collection_changed = Rc::new(RefCell::new(ChangeListeners::new()));
        let relay = provider.subscribe(Self::relay_callback(&collection_changed));
        debug!("Created navigator locator");
        Self {
            provider: Rc::new(RefCell::new(provider)),
            relay,
            collection_changed,
            provider_changed: ChangeListeners::new(),
        }
    }

    /// Create a locator around an already shared provider
    ///
    /// Fails with [`NavigatorError::Reentrant`] if the provider is borrowed.
    pub fn from_shared(provider: SharedProvider<H>) -> NavigatorResult<Self> {
        let collection_changed = Rc::new(RefCell::new(ChangeListeners::new()));
        let relay = provider
            .try_borrow_mut()
            .map_err(|_| NavigatorError::Reentrant)?
            .subscribe(Self::relay_callback(&collection_changed));
        debug!("Created navigator locator around shared provider");
        Ok(Self {
            provider,
            relay,
            collection_changed,
            provider_changed: ChangeListeners::new(),
        })
    }

    fn relay_callback(listeners: &Rc<RefCell<ChangeListeners>>) -> ChangeCallback {
        let listeners: Weak<RefCell<ChangeListeners>> = Rc::downgrade(listeners);
        Rc::new(move || {
            let Some(listeners) = listeners.upgrade() else {
                return;
            };
            let callbacks = listeners.borrow().snapshot();
            for callback in callbacks {
                callback();
            }
        })
    }

    /// The active provider
    pub fn provider(&self) -> SharedProvider<H> {
        self.provider.clone()
    }

    /// Replace the active provider
    ///
    /// The relay is attached to the new provider before it is detached
    /// from the old one, and provider-changed listeners only run once the
    /// swap is complete.
    pub fn set_provider(&mut self, provider: SharedProvider<H>) -> NavigatorResult<()> {
        if Rc::ptr_eq(&self.provider, &provider) {
            debug!("Navigator provider unchanged");
            return Ok(());
        }

        let relay = {
            let mut old = self
                .provider
                .try_borrow_mut()
                .map_err(|_| NavigatorError::Reentrant)?;
            let mut new = provider
                .try_borrow_mut()
                .map_err(|_| NavigatorError::Reentrant)?;
            let relay = new.subscribe(Self::relay_callback(&self.collection_changed));
            if !old.unsubscribe(self.relay) {
                warn!("Previous navigator provider had no relay subscription");
            }
            relay
        };

        self.provider = provider;
        self.relay = relay;
        info!("Navigator provider changed");
        self.provider_changed.notify();
        Ok(())
    }

    /// Replace the active provider with a freshly owned one
    pub fn replace_provider(
        &mut self,
        provider: impl NavigatorProvider<H> + 'static,
    ) -> NavigatorResult<()> {
        self.set_provider(Rc::new(RefCell::new(provider)))
    }

    /// Run `f` with shared access to the provider
    pub fn with_provider<R>(&self, f: impl FnOnce(&DynProvider<H>) -> R) -> NavigatorResult<R> {
        let provider = self
            .provider
            .try_borrow()
            .map_err(|_| NavigatorError::Reentrant)?;
        Ok(f(&*provider))
    }

    /// Run `f` with exclusive access to the provider
    pub fn with_provider_mut<R>(
        &self,
        f: impl FnOnce(&mut DynProvider<H>) -> R,
    ) -> NavigatorResult<R> {
        let mut provider = self
            .provider
            .try_borrow_mut()
            .map_err(|_| NavigatorError::Reentrant)?;
        Ok(f(&mut *provider))
    }

    /// Register `handle` with `tags` on the active provider
    pub fn register(
        &self,
        host: &dyn HostWorld<H>,
        handle: H,
        tags: &[&str],
    ) -> NavigatorResult<()> {
        self.with_provider_mut(|provider| provider.register(host, handle, tags))?
    }

    /// Register `handle` with a single tag on the active provider
    pub fn register_tag(
        &self,
        host: &dyn HostWorld<H>,
        handle: H,
        tag: &str,
    ) -> NavigatorResult<()> {
        self.with_provider_mut(|provider| provider.register_tag(host, handle, tag))?
    }

    /// Deregister `handle` from the active provider
    pub fn deregister(&self, handle: H) -> NavigatorResult<bool> {
        self.with_provider_mut(|provider| provider.deregister(handle))
    }

    /// Tag reference counts of the active provider
    pub fn tag_counts(&self) -> NavigatorResult<BTreeMap<String, usize>> {
        self.with_provider(|provider| provider.tag_counts())
    }

    /// Every live entry of the active provider
    pub fn entries(&self, host: &dyn HostWorld<H>) -> NavigatorResult<Vec<TrackedEntry<H>>> {
        self.with_provider_mut(|provider| provider.entries(host).collect())
    }

    /// Filtered, ordered entries of the active provider
    pub fn query(
        &self,
        host: &dyn HostWorld<H>,
        selection: &ActiveSelection,
    ) -> NavigatorResult<Vec<TrackedEntry<H>>> {
        self.with_provider_mut(|provider| provider.query(host, selection))
    }

    /// Listen for changes to the entries of whichever provider is active
    ///
    /// Callbacks run while the provider is still borrowed by the call that
    /// changed it, so calling back into the locator from one returns
    /// [`NavigatorError::Reentrant`]. Record the change and read the
    /// navigator afterwards.
    pub fn subscribe_collection_changed(&self, callback: ChangeCallback) -> SubscriptionId {
        self.collection_changed.borrow_mut().subscribe(callback)
    }

    /// Stop listening for collection changes
    pub fn unsubscribe_collection_changed(&self, id: SubscriptionId) -> bool {
        self.collection_changed.borrow_mut().unsubscribe(id)
    }

    /// Listen for the active provider being replaced
    pub fn subscribe_provider_changed(&mut self, callback: ChangeCallback) -> SubscriptionId {
        self.provider_changed.subscribe(callback)
    }

    /// Stop listening for provider replacement
    pub fn unsubscribe_provider_changed(&mut self, id: SubscriptionId) -> bool {
        self.provider_changed.unsubscribe(id)
    }
}

impl<H: Handle> Drop for NavigatorLocator<H> {
    fn drop(&mut self) {
        match self.provider.try_borrow_mut() {
            Ok(mut provider) => {
                provider.unsubscribe(self.relay);
            }
            Err(_) => warn!("Navigator provider busy while dropping locator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    struct Alive(HashSet<u32>);

    impl HostWorld<u32> for Alive {
        fn is_alive(&self, handle: u32) -> bool {
            self.0.contains(&handle)
        }

        fn display_name(&self, handle: u32) -> Option<String> {
            self.is_alive(handle).then(|| format!("Object {handle}"))
        }
    }

    fn alive(handles: &[u32]) -> Alive {
        Alive(handles.iter().copied().collect())
    }

    fn counter() -> (Rc<Cell<u32>>, ChangeCallback) {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        (hits, Rc::new(move || counter.set(counter.get() + 1)))
    }

    /// Provider double that records every call it receives
    #[derive(Default)]
    struct RecordingProvider {
        calls: Rc<RefCell<Vec<String>>>,
        listeners: ChangeListeners,
    }

    impl NavigatorProvider<u32> for RecordingProvider {
        fn register(
            &mut self,
            _host: &dyn HostWorld<u32>,
            handle: u32,
            tags: &[&str],
        ) -> NavigatorResult<()> {
            self.calls
                .borrow_mut()
                .push(format!("register {handle} {}", tags.join(",")));
            self.listeners.notify();
            Ok(())
        }

        fn deregister(&mut self, handle: u32) -> bool {
            self.calls.borrow_mut().push(format!("deregister {handle}"));
            false
        }

        fn tag_counts(&self) -> BTreeMap<String, usize> {
            BTreeMap::new()
        }

        fn all_tags(&self) -> Vec<String> {
            Vec::new()
        }

        fn contains(&self, _handle: u32) -> bool {
            false
        }

        fn len(&self) -> usize {
            0
        }

        fn entries<'a>(
            &'a mut self,
            _host: &'a dyn HostWorld<u32>,
        ) -> Box<dyn Iterator<Item = TrackedEntry<u32>> + 'a> {
            Box::new(std::iter::empty())
        }

        fn query(
            &mut self,
            _host: &dyn HostWorld<u32>,
            _selection: &ActiveSelection,
        ) -> Vec<TrackedEntry<u32>> {
            Vec::new()
        }

        fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
            self.listeners.subscribe(callback)
        }

        fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
            self.listeners.unsubscribe(id)
        }
    }

    #[test]
    fn test_relays_collection_changes() {
        let world = alive(&[1]);
        let locator = NavigatorLocator::<u32>::default();
        let (hits, callback) = counter();
        locator.subscribe_collection_changed(callback);

        locator.register_tag(&world, 1, "enemy").unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(locator.tag_counts().unwrap().get("enemy"), Some(&1));

        assert!(locator.deregister(1).unwrap());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_set_provider_moves_relay() {
        let world = alive(&[1]);
        let mut locator = NavigatorLocator::<u32>::default();
        let old = locator.provider();

        let (collection_hits, collection_cb) = counter();
        let (provider_hits, provider_cb) = counter();
        locator.subscribe_collection_changed(collection_cb);
        locator.subscribe_provider_changed(provider_cb);

        let recording = RecordingProvider::default();
        let calls = recording.calls.clone();
        locator.replace_provider(recording).unwrap();
        assert_eq!(provider_hits.get(), 1);

        // New provider is wired to existing collection listeners
        locator.register(&world, 1, &["a", "b"]).unwrap();
        assert_eq!(*calls.borrow(), vec!["register 1 a,b".to_string()]);
        assert_eq!(collection_hits.get(), 1);

        // Old provider no longer reaches them
        old.borrow_mut().register(&world, 1, &["x"]).unwrap();
        assert_eq!(collection_hits.get(), 1);
    }

    #[test]
    fn test_set_same_provider_is_noop() {
        let mut locator = NavigatorLocator::<u32>::default();
        let (provider_hits, provider_cb) = counter();
        locator.subscribe_provider_changed(provider_cb);

        let same = locator.provider();
        locator.set_provider(same).unwrap();
        assert_eq!(provider_hits.get(), 0);
    }

    #[test]
    fn test_reentrant_mutation_fails_fast() {
        let world = Rc::new(alive(&[1, 2]));
        let locator = Rc::new(NavigatorLocator::<u32>::default());
        let outcome = Rc::new(RefCell::new(None));

        let inner_locator = Rc::downgrade(&locator);
        let inner_world = world.clone();
        let inner_outcome = outcome.clone();
        locator.subscribe_collection_changed(Rc::new(move || {
            if let Some(locator) = inner_locator.upgrade() {
                let result = locator.register_tag(&*inner_world, 2, "nested");
                *inner_outcome.borrow_mut() = Some(result);
            }
        }));

        locator.register_tag(&*world, 1, "outer").unwrap();
        assert_eq!(*outcome.borrow(), Some(Err(NavigatorError::Reentrant)));

        // Outer registration completed, nested one was refused
        let counts = locator.tag_counts().unwrap();
        assert_eq!(counts.get("outer"), Some(&1));
        assert_eq!(counts.get("nested"), None);
    }

    #[test]
    fn test_swap_while_borrowed_is_refused() {
        let mut locator = NavigatorLocator::<u32>::default();
        let active = locator.provider();
        let _guard = active.borrow();

        let result = locator.replace_provider(TagRegistry::new());
        assert_eq!(result, Err(NavigatorError::Reentrant));
    }

    #[test]
    fn test_drop_detaches_relay() {
        let world = alive(&[1]);
        let locator = NavigatorLocator::<u32>::default();
        let provider = locator.provider();
        let (hits, callback) = counter();
        locator.subscribe_collection_changed(callback);
        drop(locator);

        provider.borrow_mut().register_tag(&world, 1, "x").unwrap();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_from_shared_refuses_borrowed_provider() {
        let world = alive(&[1]);
        let shared: SharedProvider<u32> = Rc::new(RefCell::new(TagRegistry::new()));

        {
            let _guard = shared.borrow();
            assert!(matches!(
                NavigatorLocator::from_shared(shared.clone()),
                Err(NavigatorError::Reentrant)
            ));
        }

        let locator = NavigatorLocator::from_shared(shared.clone()).unwrap();
        let (hits, callback) = counter();
        locator.subscribe_collection_changed(callback);
        shared.borrow_mut().register_tag(&world, 1, "x").unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_listener_reads_after_notification() {
        let world = Rc::new(alive(&[1]));
        let locator = Rc::new(NavigatorLocator::<u32>::default());
        let read_inside = Rc::new(RefCell::new(None));
        let changed = Rc::new(Cell::new(false));

        let inner_locator = Rc::downgrade(&locator);
        let inner_read = read_inside.clone();
        let flag = changed.clone();
        locator.subscribe_collection_changed(Rc::new(move || {
            flag.set(true);
            if let Some(locator) = inner_locator.upgrade() {
                *inner_read.borrow_mut() = Some(locator.tag_counts());
            }
        }));

        locator.register_tag(&*world, 1, "enemy").unwrap();

        // The provider is still borrowed while listeners run
        assert_eq!(*read_inside.borrow(), Some(Err(NavigatorError::Reentrant)));

        // Reading once the call returned sees the change
        assert!(changed.get());
        assert_eq!(locator.tag_counts().unwrap().get("enemy"), Some(&1));
    }
}
