//! Entity-Component System (ECS) functionality
//!
//! This module provides the host world that scene objects live in. The
//! navigator only ever holds `Entity` handles into it and asks the world
//! whether they are still alive.

pub mod components;
pub mod world;

// Re-export commonly used types
pub use components::{Disabled, Name, Transform};
pub use world::World;

// Re-export hecs types that users will need
pub use hecs::Entity;
