//! ImGui-based scene navigator for the engine editor
//!
//! This crate provides the scene navigator panel: tag filtering over the
//! entities gameplay code registered with the navigator, plus the settings
//! that persist the active filter between sessions. The editor is
//! feature-gated and only included in development builds.

pub mod navigator_state;
pub mod panels;
pub mod settings;
pub mod shared_state;

pub use navigator_state::{EntryActivity, NavigatorPanelState};
pub use settings::{EditorSettings, NavigatorSettings};
