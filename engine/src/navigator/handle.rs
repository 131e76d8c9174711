//! Object identity for the scene navigator
//!
//! The navigator never owns the objects it tracks. It keeps a copyable
//! handle and asks the host world about it whenever it needs to know
//! whether the object still exists.

use std::fmt::Debug;
use std::hash::Hash;

/// A lightweight, copyable identity of an object owned by the host world
pub trait Handle: Copy + Eq + Ord + Hash + Debug + 'static {}

impl<T> Handle for T where T: Copy + Eq + Ord + Hash + Debug + 'static {}

/// Capabilities the host world provides for the handles it hands out
pub trait HostWorld<H: Handle> {
    /// Whether the object behind `handle` still exists
    fn is_alive(&self, handle: H) -> bool;

    /// Display name of the object, `None` if it no longer exists
    fn display_name(&self, handle: H) -> Option<String>;
}
