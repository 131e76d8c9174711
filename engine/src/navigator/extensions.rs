//! Registration calls for gameplay code
//!
//! Annotating an entity is a tooling concern. With the `navigator` feature
//! disabled these calls compile to nothing, so gameplay code can keep them
//! in shipping builds.

use super::entry::DEFAULT_TAG;
use super::locator::NavigatorLocator;
use crate::core::entity::World;
use hecs::Entity;

/// Navigator annotations on entities
pub trait NavigatorExt: Copy {
    /// Register this entity under [`DEFAULT_TAG`]
    fn add_to_navigator_default(self, locator: &NavigatorLocator<Entity>, world: &World) {
        self.add_to_navigator(locator, world, DEFAULT_TAG);
    }

    /// Register this entity under `tag`
    fn add_to_navigator(self, locator: &NavigatorLocator<Entity>, world: &World, tag: &str) {
        self.add_to_navigator_tags(locator, world, &[tag]);
    }

    /// Register this entity under every tag in `tags`
    fn add_to_navigator_tags(self, locator: &NavigatorLocator<Entity>, world: &World, tags: &[&str]);

    /// Remove this entity from the navigator
    fn remove_from_navigator(self, locator: &NavigatorLocator<Entity>);
}

impl NavigatorExt for Entity {
    fn add_to_navigator_tags(self, locator: &NavigatorLocator<Entity>, world: &World, tags: &[&str]) {
        #[cfg(feature = "navigator")]
        {
            if let Err(e) = locator.register(world, self, tags) {
                tracing::warn!(entity = ?self, tags = ?tags, "Failed to add entity to navigator: {}", e);
            }
        }
        #[cfg(not(feature = "navigator"))]
        {
            let _ = (locator, world, tags);
        }
    }

    fn remove_from_navigator(self, locator: &NavigatorLocator<Entity>) {
        #[cfg(feature = "navigator")]
        {
            if let Err(e) = locator.deregister(self) {
                tracing::warn!(entity = ?self, "Failed to remove entity from navigator: {}", e);
            }
        }
        #[cfg(not(feature = "navigator"))]
        {
            let _ = locator;
        }
    }
}

#[cfg(all(test, feature = "navigator"))]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut world = World::new();
        let locator = NavigatorLocator::default();
        let player = world.spawn_named("Player");

        player.add_to_navigator(&locator, &world, "hero");
        player.add_to_navigator_tags(&locator, &world, &["hero", "controllable"]);

        let counts = locator.tag_counts().unwrap();
        assert_eq!(counts.get("hero"), Some(&1));
        assert_eq!(counts.get("controllable"), Some(&1));

        player.remove_from_navigator(&locator);
        assert!(locator.tag_counts().unwrap().is_empty());
    }

    #[test]
    fn test_default_tag() {
        let mut world = World::new();
        let locator = NavigatorLocator::default();
        let prop = world.spawn_named("Barrel");

        prop.add_to_navigator_default(&locator, &world);
        assert_eq!(locator.tag_counts().unwrap().get(DEFAULT_TAG), Some(&1));
    }

    #[test]
    fn test_invalid_tags_are_logged_not_propagated() {
        let mut world = World::new();
        let locator = NavigatorLocator::default();
        let prop = world.spawn_named("Barrel");

        prop.add_to_navigator_tags(&locator, &world, &[]);
        prop.add_to_navigator(&locator, &world, "");
        assert!(locator.tag_counts().unwrap().is_empty());
    }
}
