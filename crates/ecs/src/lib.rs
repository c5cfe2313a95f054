//! Components attached to scene entities: a name and an optional renderable.
//!
//! Gameplay finds its entities by name once at setup; the renderer walks the
//! renderables every frame. Both maps are keyed by [`EntityId`], and ids are
//! allocated in spawn order, so name queries return entities in the order
//! the scene declared them.

use platformer_common::EntityId;
use std::collections::BTreeMap;

/// Asset handle of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Asset handle of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

/// Draw an entity with this mesh and material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
}

#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    names: BTreeMap<EntityId, Name>,
    renderables: BTreeMap<EntityId, Renderable>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name an entity. Returns the name it had before, if any.
    pub fn set_name(&mut self, entity: EntityId, name: String) -> Option<Name> {
        tracing::trace!(%entity, %name, "name set");
        self.names.insert(entity, Name(name))
    }

    pub fn remove_name(&mut self, entity: EntityId) -> Option<Name> {
        self.names.remove(&entity)
    }

    pub fn get_name(&self, entity: EntityId) -> Option<&Name> {
        self.names.get(&entity)
    }

    pub fn names(&self) -> &BTreeMap<EntityId, Name> {
        &self.names
    }

    /// All entities carrying exactly this name, in spawn order.
    pub fn by_name(&self, name: &str) -> Vec<EntityId> {
        self.named(name).collect()
    }

    /// The earliest-spawned entity with this name.
    pub fn first_by_name(&self, name: &str) -> Option<EntityId> {
        self.named(name).next()
    }

    fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = EntityId> + 'a {
        self.names
            .iter()
            .filter(move |(_, n)| n.0 == name)
            .map(|(id, _)| *id)
    }

    /// Attach a renderable. Returns the one it replaced, if any.
    pub fn set_renderable(&mut self, entity: EntityId, renderable: Renderable) -> Option<Renderable> {
        self.renderables.insert(entity, renderable)
    }

    pub fn remove_renderable(&mut self, entity: EntityId) -> Option<Renderable> {
        self.renderables.remove(&entity)
    }

    pub fn get_renderable(&self, entity: EntityId) -> Option<&Renderable> {
        self.renderables.get(&entity)
    }

    pub fn renderables(&self) -> &BTreeMap<EntityId, Renderable> {
        &self.renderables
    }

    /// Drop every component of an entity.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.names.remove(&entity);
        self.renderables.remove(&entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn(mesh: u64, material: u64) -> Renderable {
        Renderable {
            mesh: MeshHandle(mesh),
            material: MaterialHandle(material),
        }
    }

    #[test]
    fn renaming_returns_previous_name() {
        let mut store = ComponentStore::new();
        let id = EntityId(1);
        assert_eq!(store.set_name(id, "Crate".into()), None);
        assert_eq!(
            store.set_name(id, "Star".into()),
            Some(Name("Crate".into()))
        );
        assert_eq!(store.get_name(id).unwrap().0, "Star");
        assert_eq!(store.remove_name(id), Some(Name("Star".into())));
        assert!(store.get_name(id).is_none());
    }

    #[test]
    fn by_name_returns_spawn_order() {
        let mut store = ComponentStore::new();
        store.set_name(EntityId(5), "Crate".into());
        store.set_name(EntityId(2), "Crate".into());
        store.set_name(EntityId(3), "Star".into());
        store.set_name(EntityId(9), "Crate".into());

        assert_eq!(
            store.by_name("Crate"),
            vec![EntityId(2), EntityId(5), EntityId(9)]
        );
        assert_eq!(store.first_by_name("Crate"), Some(EntityId(2)));
        assert_eq!(store.first_by_name("Star"), Some(EntityId(3)));
        assert!(store.by_name("Goon").is_empty());
        assert_eq!(store.first_by_name("Goon"), None);
    }

    #[test]
    fn renderable_replace_and_remove() {
        let mut store = ComponentStore::new();
        let id = EntityId(0);
        assert_eq!(store.set_renderable(id, drawn(1, 2)), None);
        assert_eq!(store.set_renderable(id, drawn(1, 3)), Some(drawn(1, 2)));
        assert_eq!(store.get_renderable(id), Some(&drawn(1, 3)));
        assert_eq!(store.renderables().len(), 1);

        store.remove_renderable(id);
        assert!(store.get_renderable(id).is_none());
    }

    #[test]
    fn remove_entity_clears_all() {
        let mut store = ComponentStore::new();
        let id = EntityId(4);
        store.set_name(id, "Star".into());
        store.set_renderable(id, drawn(0, 0));

        store.remove_entity(id);
        assert!(store.get_name(id).is_none());
        assert!(store.get_renderable(id).is_none());
        assert!(store.names().is_empty());
    }
}
