//! Scene navigator: tag-indexed registry of scene objects
//!
//! Gameplay code annotates entities with free-text tags. Tooling filters the
//! tagged set by tag union ([`MatchMode::MatchAny`]) or intersection
//! ([`MatchMode::MatchAll`]) and gets back a list ordered by display name.
//!
//! - [`TagRegistry`] owns the entity/tag relation and prunes destroyed
//!   entities lazily, the next time it walks over them.
//! - [`filter_entries`] is the pure filtering function; registries answer the
//!   same question through their tag index with [`NavigatorProvider::query`].
//! - [`NavigatorLocator`] holds the active provider and relays its change
//!   notifications across provider swaps.

pub mod entry;
pub mod error;
pub mod events;
pub mod extensions;
pub mod filter;
pub mod handle;
pub mod locator;
pub mod registry;
pub mod selection;


pub use entry::{TagIndex, TrackedEntry, DEFAULT_TAG};
pub use error::{NavigatorError, NavigatorResult};
pub use events::{ChangeCallback, ChangeListeners, SubscriptionId};
pub use extensions::NavigatorExt;
pub use filter::{filter_entries, sort_for_display, ActiveSelection, MatchMode};
pub use handle::{Handle, HostWorld};
pub use locator::{DynProvider, NavigatorLocator, SharedProvider};
pub use registry::{Entries, NavigatorProvider, TagRegistry};
pub use selection::{
    decode_selection, encode_selection, load_selection_or_default, SELECTION_SEPARATOR,
};
