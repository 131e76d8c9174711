//! Game entry point with a headless scene navigator session

use engine::prelude::*;
use tracing::info;

#[cfg(feature = "editor")]
use editor::{shared_state, EditorSettings, NavigatorPanelState};

/// Spawn the demo scene and annotate it for the navigator
fn create_demo_scene(world: &mut World, locator: &NavigatorLocator<Entity>) -> Vec<Entity> {
    let scene: [(&str, Vec3, &[&str]); 6] = [
        ("Player", Vec3::new(0.0, 1.0, 0.0), &["player", "controllable"]),
        ("Goblin", Vec3::new(4.0, 0.0, 2.0), &["enemy", "melee"]),
        ("Archer", Vec3::new(-6.0, 0.0, 8.0), &["enemy", "ranged"]),
        ("Wyvern", Vec3::new(0.0, 12.0, 20.0), &["enemy", "ranged", "flying"]),
        ("Health Potion", Vec3::new(2.0, 0.5, -3.0), &["pickup"]),
        ("Barrel", Vec3::new(-1.0, 0.0, -1.0), &[]),
    ];
    // Spawned switched off so the navigator draws it dimmed
    const DISABLED: &str = "Health Potion";

    let mut entities = Vec::with_capacity(scene.len());
    for (name, position, tags) in scene {
        let entity = if name == DISABLED {
            world.spawn((Name::new(name), Transform::from_position(position), Disabled))
        } else {
            world.spawn((Name::new(name), Transform::from_position(position)))
        };
        if tags.is_empty() {
            entity.add_to_navigator_default(locator, world);
        } else {
            entity.add_to_navigator_tags(locator, world, tags);
        }
        entities.push(entity);
    }

    info!("Created demo scene with {} entities", entities.len());
    entities
}

fn main() {
    // Initialize logging
    engine::init_logging();
    info!("Starting scene navigator demo");

    let mut world = World::new();
    let locator = NavigatorLocator::default();
    let entities = create_demo_scene(&mut world, &locator);

    #[cfg(feature = "editor")]
    {
        let mut locator = locator;
        run_editor_session(&mut world, &mut locator, &entities);
    }

    #[cfg(not(feature = "editor"))]
    {
        let _ = entities;
        info!("Editor disabled, navigator registrations were skipped");
    }
}

#[cfg(feature = "editor")]
fn run_editor_session(
    world: &mut World,
    locator: &mut NavigatorLocator<Entity>,
    entities: &[Entity],
) {
    let mut settings = EditorSettings::load();
    let mut panel = NavigatorPanelState::from_settings(&settings.navigator);
    let shared = shared_state::create_shared_state();
    panel.attach(locator);

    if panel.selection().is_empty() {
        panel.toggle_tag("enemy");
    }

    let log_panel = |panel: &mut NavigatorPanelState, world: &World, label: &str| {
        if let Err(e) = panel.refresh(locator, world) {
            tracing::warn!("Navigator refresh failed: {}", e);
            return;
        }
        let names: Vec<&str> = panel
            .filtered()
            .iter()
            .map(|entry| entry.display_name.as_str())
            .collect();
        info!(
            tags = ?panel.tag_counts(),
            mode = ?panel.selection().mode,
            "{}: {:?}",
            label,
            names
        );
    };

    log_panel(&mut panel, &*world, "Initial filter");

    panel.toggle_tag("ranged");
    panel.set_match_mode(MatchMode::MatchAll);
    log_panel(&mut panel, &*world, "Ranged enemies");

    // Destroy the wyvern behind the navigator's back
    if let Some(&wyvern) = entities.get(3) {
        if world.despawn(wyvern).is_ok() {
            info!("Despawned {:?}", wyvern);
        }
    }
    log_panel(&mut panel, &*world, "After despawn");

    if let Some(first) = panel.filtered().first().map(|entry| entry.handle) {
        panel.isolate(first, world, &shared);
    }

    settings.navigator = panel.to_settings();
    if let Err(e) = settings.save() {
        tracing::warn!("Failed to save editor settings: {}", e);
    }
    panel.detach(locator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene() {
        let mut world = World::new();
        let locator = NavigatorLocator::default();
        let entities = create_demo_scene(&mut world, &locator);

        assert_eq!(entities.len(), 6);
        assert!(!world.is_enabled(entities[4]));
        assert!(world.is_enabled(entities[0]));

        let counts = locator.tag_counts().unwrap();
        if cfg!(feature = "editor") {
            assert_eq!(counts.get("enemy"), Some(&3));
            assert_eq!(counts.get(DEFAULT_TAG), Some(&1));
        } else {
            assert!(counts.is_empty());
        }
    }
}
