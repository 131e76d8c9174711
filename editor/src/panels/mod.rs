//! Editor UI panels

pub mod navigator;

pub use navigator::render_navigator_panel;
