//! Shared selection state for editor panels
//!
//! Panels that select or isolate entities write here; the viewport and any
//! detached panel windows read from here.

use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Editor state shared between panels
#[derive(Debug, Default)]
pub struct SharedEditorState {
    /// Currently selected entity
    pub selected_entity: Option<hecs::Entity>,
    /// Entity the view is isolated to, if any
    pub isolated_entity: Option<hecs::Entity>,
}

impl SharedEditorState {
    /// Create a new shared editor state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selected entity
    pub fn set_selected_entity(&mut self, entity: Option<hecs::Entity>) {
        if self.selected_entity != entity {
            debug!(
                "Selected entity changed: {:?} -> {:?}",
                self.selected_entity, entity
            );
            self.selected_entity = entity;
        }
    }

    /// Isolate the view to `entity` and select it
    pub fn isolate(&mut self, entity: hecs::Entity) {
        if self.isolated_entity != Some(entity) {
            debug!(
                "Isolation changed: {:?} -> {:?}",
                self.isolated_entity, entity
            );
            self.isolated_entity = Some(entity);
        }
        self.set_selected_entity(Some(entity));
    }

    /// Show everything again
    pub fn clear_isolation(&mut self) {
        if self.isolated_entity.take().is_some() {
            debug!("Isolation cleared");
        }
    }
}

/// Thread-safe wrapper for shared editor state
pub type SharedEditorStateHandle = Arc<Mutex<SharedEditorState>>;

/// Create a new shared editor state handle
pub fn create_shared_state() -> SharedEditorStateHandle {
    Arc::new(Mutex::new(SharedEditorState::new()))
}

/// Safely isolate an entity across all windows
pub fn isolate_entity(shared_state: &SharedEditorStateHandle, entity: hecs::Entity) -> bool {
    match shared_state.lock() {
        Ok(mut state) => {
            state.isolate(entity);
            true
        }
        Err(e) => {
            warn!("Failed to lock shared state for isolation: {}", e);
            false
        }
    }
}

/// Safely get the current selected entity
pub fn get_selected_entity(shared_state: &SharedEditorStateHandle) -> Option<hecs::Entity> {
    match shared_state.lock() {
        Ok(state) => state.selected_entity,
        Err(e) => {
            warn!(
                "Failed to lock shared state for reading selected entity: {}",
                e
            );
            None
        }
    }
}

/// Safely get the current isolated entity
pub fn get_isolated_entity(shared_state: &SharedEditorStateHandle) -> Option<hecs::Entity> {
    match shared_state.lock() {
        Ok(state) => state.isolated_entity,
        Err(e) => {
            warn!(
                "Failed to lock shared state for reading isolated entity: {}",
                e
            );
            None
        }
    }
}
