use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use platformer_assets::{AssetStore, MeshShape};
use platformer_common::Transform;
use platformer_ecs::{ComponentStore, MaterialHandle, MeshHandle};
use platformer_kernel::World;
use std::collections::HashMap;

/// Size of the slab drawn for an infinite ground plane.
const PLANE_SLAB: Vec3 = Vec3::new(200.0, 1.0, 4.0);
const FALLBACK_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct InstanceData {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

/// Material colours and mesh shapes resolved from the asset store.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<MaterialHandle, [f32; 4]>,
    shapes: HashMap<MeshHandle, MeshShape>,
}

impl Palette {
    pub fn from_assets(assets: &AssetStore) -> Self {
        Self {
            colors: assets
                .materials()
                .map(|(id, m)| (MaterialHandle(id.0), m.base_color))
                .collect(),
            shapes: assets
                .meshes()
                .map(|(id, m)| (MeshHandle(id.0), m.shape))
                .collect(),
        }
    }

    /// Unknown materials draw grey.
    pub fn color(&self, material: MaterialHandle) -> [f32; 4] {
        self.colors.get(&material).copied().unwrap_or(FALLBACK_COLOR)
    }

    /// Unknown meshes draw as boxes.
    pub fn shape(&self, mesh: MeshHandle) -> MeshShape {
        self.shapes.get(&mesh).copied().unwrap_or(MeshShape::Box)
    }

    pub fn material_count(&self) -> usize {
        self.colors.len()
    }
}

/// Model matrix placing the unit cube for an entity.
///
/// Boxes and balls take the entity's scale as their size. A plane becomes a
/// wide slab hanging below the entity origin so its top face is the ground
/// surface.
pub fn instance_model(transform: &Transform, shape: MeshShape) -> Mat4 {
    match shape {
        MeshShape::Box | MeshShape::Ball => Mat4::from_scale_rotation_translation(
            transform.scale,
            transform.rotation,
            transform.position,
        ),
        MeshShape::Plane => {
            let drop = transform.rotation * Vec3::new(0.0, PLANE_SLAB.y * 0.5, 0.0);
            Mat4::from_scale_rotation_translation(
                PLANE_SLAB,
                transform.rotation,
                transform.position - drop,
            )
        }
    }
}

pub(crate) fn build_instances(
    world: &World,
    components: &ComponentStore,
    palette: &Palette,
    limit: usize,
) -> Vec<InstanceData> {
    components
        .renderables()
        .iter()
        .filter_map(|(id, r)| {
            let data = world.get(*id)?;
            Some(InstanceData {
                model: instance_model(&data.transform, palette.shape(r.mesh)).to_cols_array_2d(),
                color: palette.color(r.material),
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use platformer_assets::{Material, Mesh};
    use platformer_ecs::Renderable;

    #[test]
    fn plane_top_face_at_origin() {
        let t = Transform::planar(0.0, -1.0, 0.0);
        let m = instance_model(&t, MeshShape::Plane);
        let top = m * Vec4::new(0.0, 0.5, 0.0, 1.0);
        assert!((top.truncate() - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn box_uses_entity_scale() {
        let t = Transform {
            scale: Vec3::new(0.5, 1.0, 0.5),
            ..Transform::planar(2.0, 3.0, 0.0)
        };
        let m = instance_model(&t, MeshShape::Box);
        let corner = m * Vec4::new(0.5, 0.5, 0.0, 1.0);
        assert!((corner.truncate() - Vec3::new(2.25, 3.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn palette_resolves_and_falls_back() {
        let mut assets = AssetStore::new();
        let mat = assets.register_material(Material {
            name: "Star".into(),
            base_color: [1.0, 0.85, 0.1, 1.0],
        });
        let mesh = assets.register_mesh(Mesh {
            name: "plane.mesh".into(),
            shape: MeshShape::Plane,
        });
        let palette = Palette::from_assets(&assets);
        assert_eq!(palette.color(MaterialHandle(mat.0)), [1.0, 0.85, 0.1, 1.0]);
        assert_eq!(palette.color(MaterialHandle(7)), FALLBACK_COLOR);
        assert_eq!(palette.shape(MeshHandle(mesh.0)), MeshShape::Plane);
        assert_eq!(palette.shape(MeshHandle(7)), MeshShape::Box);
        assert_eq!(palette.material_count(), 1);
    }

    #[test]
    fn only_renderable_entities_become_instances() {
        let mut world = World::new();
        let mut components = ComponentStore::new();
        let drawn = world.spawn(Transform::default());
        world.spawn(Transform::default());
        components.set_renderable(
            drawn,
            Renderable {
                mesh: MeshHandle(1),
                material: MaterialHandle(2),
            },
        );
        let palette = Palette::default();
        assert_eq!(build_instances(&world, &components, &palette, 100).len(), 1);
        assert!(build_instances(&world, &components, &palette, 0).is_empty());
    }
}
