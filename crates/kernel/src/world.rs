use platformer_common::{EntityId, Transform};
use std::collections::{BTreeMap, BTreeSet};

/// The scene-side world: where rendered entities live.
///
/// The physics simulation owns the truth for moving bodies; the world holds
/// the copies the renderer draws. Every transform write marks the entity as
/// updated so the render side can pick up only what changed.
///
/// Uses BTreeMap for deterministic iteration order. Ids are sequential, so
/// iteration order is also spawn order.
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    next_id: u64,
    tick: u64,
    /// Elapsed simulated time in seconds.
    time: f64,
    updated: BTreeSet<EntityId>,
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone)]
pub struct EntityData {
    pub transform: Transform,
}

impl World {
    /// Create an empty world at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames advanced so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Elapsed simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read-only access to all entities, in spawn order.
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a new entity with the given transform. Returns its id.
    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, EntityData { transform });
        self.updated.insert(id);
        id
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        self.updated.remove(&id);
        self.entities.remove(&id)
    }

    /// Get a reference to entity data.
    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to entity data.
    ///
    /// Writes through this reference are not tracked; call
    /// [`World::mark_updated`] afterwards.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityData> {
        self.entities.get_mut(&id)
    }

    /// Replace an entity's transform and mark it updated.
    pub fn set_transform(&mut self, id: EntityId, new: Transform) -> bool {
        if let Some(data) = self.entities.get_mut(&id) {
            data.transform = new;
            self.updated.insert(id);
            true
        } else {
            false
        }
    }

    /// Flag an entity's transform as changed.
    pub fn mark_updated(&mut self, id: EntityId) {
        if self.entities.contains_key(&id) {
            self.updated.insert(id);
        }
    }

    pub fn is_updated(&self, id: EntityId) -> bool {
        self.updated.contains(&id)
    }

    /// Drain the updated set, in id order.
    pub fn take_updated(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.updated).into_iter().collect()
    }

    /// Advance the frame clock by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.time += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.time(), 0.0);
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn spawn_and_despawn() {
        let mut w = World::new();
        let id = w.spawn(Transform::default());
        assert_eq!(w.entity_count(), 1);
        assert!(w.get(id).is_some());

        let data = w.despawn(id);
        assert!(data.is_some());
        assert_eq!(w.entity_count(), 0);
        assert!(!w.is_updated(id));
    }

    #[test]
    fn ids_follow_spawn_order() {
        let mut w = World::new();
        let ids: Vec<EntityId> = (0..10).map(|_| w.spawn(Transform::default())).collect();
        let keys: Vec<EntityId> = w.entities().keys().copied().collect();
        assert_eq!(keys, ids);
    }

    #[test]
    fn advance_moves_clock() {
        let mut w = World::new();
        w.advance(0.5);
        w.advance(0.25);
        assert_eq!(w.tick(), 2);
        assert!((w.time() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn set_transform_marks_updated() {
        let mut w = World::new();
        let a = w.spawn(Transform::default());
        let b = w.spawn(Transform::default());
        w.take_updated();

        let moved = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Transform::default()
        };
        assert!(w.set_transform(b, moved));
        assert!(w.is_updated(b));
        assert!(!w.is_updated(a));
        assert_eq!(w.get(b).unwrap().transform.position, moved.position);

        assert_eq!(w.take_updated(), vec![b]);
        assert!(w.take_updated().is_empty());
    }

    #[test]
    fn set_transform_unknown_entity() {
        let mut w = World::new();
        assert!(!w.set_transform(EntityId(99), Transform::default()));
        w.mark_updated(EntityId(99));
        assert!(w.take_updated().is_empty());
    }
}
