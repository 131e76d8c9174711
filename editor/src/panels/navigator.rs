//! Scene navigator panel
//!
//! Lists every tag known to the navigator on the left and the entities
//! matching the active tags on the right. Clicking an entity isolates it.

use crate::navigator_state::{EntryActivity, NavigatorPanelState};
use crate::shared_state::SharedEditorStateHandle;
use engine::core::entity::World;
use engine::navigator::{MatchMode, NavigatorLocator};
use imgui::*;
use tracing::warn;

/// Width of the tag column
const TAG_COLUMN_WIDTH: f32 = 160.0;

/// Render the scene navigator panel
pub fn render_navigator_panel(
    ui: &imgui::Ui,
    state: &mut NavigatorPanelState,
    locator: &NavigatorLocator<hecs::Entity>,
    world: &World,
    shared_state: &SharedEditorStateHandle,
) {
    if let Err(e) = state.refresh(locator, world) {
        warn!("Failed to refresh scene navigator: {}", e);
    }

    ui.window("Scene Navigator")
        .size([480.0, 360.0], Condition::FirstUseEver)
        .resizable(true)
        .build(|| {
            render_toolbar(ui, state);
            ui.separator();

            ui.child_window("navigator_tags")
                .size([TAG_COLUMN_WIDTH, 0.0])
                .border(true)
                .build(|| render_tags(ui, state));

            ui.same_line();

            let isolate_target = ui
                .child_window("navigator_objects")
                .size([0.0, 0.0])
                .border(true)
                .build(|| render_objects(ui, state, world))
                .flatten();

            if let Some(entity) = isolate_target {
                state.isolate(entity, world, shared_state);
            }
        });
}

fn render_toolbar(ui: &imgui::Ui, state: &mut NavigatorPanelState) {
    let mode = state.selection().mode;
    for candidate in [MatchMode::MatchAny, MatchMode::MatchAll] {
        if ui.radio_button_bool(candidate.label(), mode == candidate) {
            state.set_match_mode(candidate);
        }
        ui.same_line();
    }

    if ui.button("Clear") {
        state.clear_selection();
    }
    ui.same_line();
    if ui.button("Rebuild") {
        state.mark_dirty();
    }
}

fn render_tags(ui: &imgui::Ui, state: &mut NavigatorPanelState) {
    ui.text_disabled("Tags");

    let tags = state.visible_tags();
    if tags.is_empty() {
        ui.text_disabled("(empty)");
        return;
    }

    let mut toggled = None;
    for (tag, count) in &tags {
        let active = state.selection().is_active(tag);
        let color = state.tag_color(tag);
        let _color = ui.push_style_color(StyleColor::Text, color);
        if ui
            .selectable_config(format!("{tag} ({count})##tag_{tag}"))
            .selected(active)
            .build()
        {
            toggled = Some(tag.clone());
        }
    }

    if let Some(tag) = toggled {
        state.toggle_tag(&tag);
    }
}

fn render_objects(
    ui: &imgui::Ui,
    state: &mut NavigatorPanelState,
    world: &World,
) -> Option<hecs::Entity> {
    if state.filtered().is_empty() {
        ui.text_disabled("(empty)");
        return None;
    }

    let rows: Vec<(hecs::Entity, String)> = state
        .filtered()
        .iter()
        .map(|entry| (entry.handle, entry.display_name.clone()))
        .collect();

    let mut clicked = None;
    for (entity, name) in rows {
        let color = state.entry_color(&name, EntryActivity::of(entity, world));
        let _color = ui.push_style_color(StyleColor::Text, color);
        if ui
            .selectable_config(format!("{name}##entity_{}", entity.id()))
            .build()
        {
            clicked = Some(entity);
        }
    }
    clicked
}
