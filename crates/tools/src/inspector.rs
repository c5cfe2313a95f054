use glam::EulerRot;
use platformer_common::EntityId;
use platformer_ecs::ComponentStore;
use platformer_kernel::World;

/// Read-only queries over the world for the HUD and the CLI.
pub struct WorldInspector;

impl WorldInspector {
    pub fn summary(world: &World, components: &ComponentStore) -> WorldSummary {
        WorldSummary {
            tick: world.tick(),
            time: world.time(),
            entity_count: world.entity_count(),
            named: components.names().len(),
            renderable: components.renderables().len(),
        }
    }

    pub fn inspect_entity(
        world: &World,
        components: &ComponentStore,
        id: EntityId,
    ) -> Option<EntityInfo> {
        let t = world.get(id)?.transform;
        let (_, _, angle) = t.rotation.to_euler(EulerRot::XYZ);
        Some(EntityInfo {
            id,
            name: components.get_name(id).map(|n| n.0.clone()),
            position: [t.position.x, t.position.y],
            angle,
            scale: t.scale.to_array(),
            renderable: components.get_renderable(id).is_some(),
        })
    }

    /// Named entities in spawn order.
    pub fn list_named(components: &ComponentStore) -> Vec<(EntityId, String)> {
        components
            .names()
            .iter()
            .map(|(id, n)| (*id, n.0.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub tick: u64,
    pub time: f64,
    pub entity_count: usize,
    pub named: usize,
    pub renderable: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame={} t={:.2}s entities={} named={} renderable={}",
            self.tick, self.time, self.entity_count, self.named, self.renderable
        )
    }
}

/// Planar view of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: Option<String>,
    pub position: [f32; 2],
    /// Rotation about z in radians.
    pub angle: f32,
    pub scale: [f32; 3],
    pub renderable: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} pos=({:.2}, {:.2}) angle={:.2} scale=({:.2}, {:.2}, {:.2})",
            self.id,
            self.name.as_deref().unwrap_or("-"),
            self.position[0],
            self.position[1],
            self.angle,
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_common::Transform;
    use platformer_ecs::{MaterialHandle, MeshHandle, Renderable};

    fn sample() -> (World, ComponentStore, EntityId) {
        let mut world = World::new();
        let mut components = ComponentStore::new();
        let star = world.spawn(Transform::planar(4.0, 1.0, 0.5));
        components.set_name(star, "Star".into());
        components.set_renderable(
            star,
            Renderable {
                mesh: MeshHandle(1),
                material: MaterialHandle(2),
            },
        );
        world.spawn(Transform::default());
        (world, components, star)
    }

    #[test]
    fn summary_counts() {
        let (mut world, components, _) = sample();
        world.advance(0.5);
        let s = WorldInspector::summary(&world, &components);
        assert_eq!(s.tick, 1);
        assert_eq!(s.entity_count, 2);
        assert_eq!(s.named, 1);
        assert_eq!(s.renderable, 1);
        assert_eq!(s.to_string(), "frame=1 t=0.50s entities=2 named=1 renderable=1");
    }

    #[test]
    fn inspect_reads_planar_pose() {
        let (world, components, star) = sample();
        let info = WorldInspector::inspect_entity(&world, &components, star).unwrap();
        assert_eq!(info.name.as_deref(), Some("Star"));
        assert_eq!(info.position, [4.0, 1.0]);
        assert!((info.angle - 0.5).abs() < 1e-5);
        assert!(info.renderable);
        assert!(info.to_string().contains("Star pos=(4.00, 1.00)"));
    }

    #[test]
    fn inspect_missing_entity() {
        let (world, components, _) = sample();
        assert!(WorldInspector::inspect_entity(&world, &components, EntityId(99)).is_none());
    }

    #[test]
    fn lists_only_named() {
        let (_, components, star) = sample();
        assert_eq!(
            WorldInspector::list_named(&components),
            vec![(star, "Star".to_string())]
        );
    }
}
