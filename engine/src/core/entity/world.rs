//! World wrapper providing helper methods for entity management

use super::components::{Disabled, Name, Transform};
use crate::navigator::HostWorld;
use hecs::Entity;
use tracing::debug;

/// Wrapper around hecs::World providing additional helper methods
pub struct World {
    inner: hecs::World,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn a new entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn a named entity with a default transform
    pub fn spawn_named(&mut self, name: impl Into<String>) -> Entity {
        let name = name.into();
        let entity = self.inner.spawn((Name(name.clone()), Transform::default()));
        debug!(entity = ?entity, name = %name, "Spawned named entity");
        entity
    }

    /// Get a reference to a component on an entity
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Despawn an entity and all its components
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world has no entities
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether the entity exists and is not marked [`Disabled`]
    pub fn is_enabled(&self, entity: Entity) -> bool {
        self.inner.contains(entity) && self.get::<Disabled>(entity).is_err()
    }

    /// Human readable name for an entity, falling back to its id
    pub fn entity_name(&self, entity: Entity) -> Option<String> {
        if !self.inner.contains(entity) {
            return None;
        }
        match self.get::<Name>(entity) {
            Ok(name) if !name.0.is_empty() => Some(name.0.clone()),
            _ => Some(format!("Entity {}", entity.id())),
        }
    }
}

impl HostWorld<Entity> for World {
    fn is_alive(&self, handle: Entity) -> bool {
        self.contains(handle)
    }

    fn display_name(&self, handle: Entity) -> Option<String> {
        self.entity_name(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_spawn() {
        let mut world = World::new();
        let entity = world.spawn((Transform::default(),));
        assert!(world.contains(entity));
    }

    #[test]
    fn test_spawn_named() {
        let mut world = World::new();
        let entity = world.spawn_named("Player");

        assert_eq!(world.get::<Name>(entity).unwrap().0, "Player");
        assert!(world.get::<Transform>(entity).is_ok());
        assert_eq!(world.entity_name(entity).as_deref(), Some("Player"));
    }

    #[test]
    fn test_entity_name_fallback() {
        let mut world = World::new();
        let entity = world.spawn((Transform::default(),));

        assert_eq!(
            world.entity_name(entity),
            Some(format!("Entity {}", entity.id()))
        );
    }

    #[test]
    fn test_host_world_liveness() {
        let mut world = World::new();
        let entity = world.spawn_named("Crate");
        assert!(world.is_alive(entity));

        world.despawn(entity).unwrap();
        assert!(!world.is_alive(entity));
        assert_eq!(world.display_name(entity), None);
        assert!(world.is_empty());
    }

    #[test]
    fn test_is_enabled() {
        let mut world = World::new();
        let lamp = world.spawn_named("Lamp");
        let broken = world.spawn((Name::new("Broken Lamp"), Transform::default(), Disabled));

        assert!(world.is_enabled(lamp));
        assert!(!world.is_enabled(broken));

        world.despawn(lamp).unwrap();
        assert!(!world.is_enabled(lamp));
    }
}
