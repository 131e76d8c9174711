//! Errors reported by the scene navigator

/// Errors that can occur while registering or filtering scene objects
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigatorError {
    #[error("An entity must be registered with at least one tag")]
    NoTags,

    #[error("Tags must not be empty")]
    EmptyTag,

    #[error("Tag {0:?} contains the reserved selection separator")]
    ReservedSeparator(String),

    #[error("Unsupported match mode: {0}")]
    UnsupportedMatchMode(i32),

    #[error("Failed to load persisted selection: {0}")]
    PersistenceLoad(String),

    #[error("Navigator provider is already borrowed by an in-flight operation")]
    Reentrant,
}

/// Convenience alias for navigator results
pub type NavigatorResult<T> = Result<T, NavigatorError>;
