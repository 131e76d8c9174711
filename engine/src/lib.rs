//! Engine runtime for the scene navigator
//!
//! This crate provides the host world entities live in and the scene
//! navigator: a tag-indexed registry that gameplay code annotates entities
//! with and tooling filters by tag.

pub mod core;
pub mod navigator;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{Disabled, Entity, Name, Transform, World};

    // Navigator types
    pub use crate::navigator::{
        ActiveSelection, MatchMode, NavigatorError, NavigatorExt, NavigatorLocator,
        NavigatorProvider, TagRegistry, TrackedEntry, DEFAULT_TAG,
    };

    // Math types
    pub use glam::Vec3;
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
