//! Components scene objects carry in the host world

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Placement of a scene object
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// World space position
    pub position: Vec3,
}

impl Transform {
    /// Transform placed at `position`
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// Name component for user-friendly entity identification
///
/// The scene navigator captures this as the display name when an entity is
/// registered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marker for scene objects that exist but are switched off
///
/// Disabled objects stay in the navigator; tooling draws them dimmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disabled;
