use glam::Vec3;
use platformer_ecs::ComponentStore;
use platformer_kernel::World;
use std::fmt::Write;

/// Camera placement for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    /// Side view of the play area, looking down -z.
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 12.0),
            target: Vec3::new(0.0, 2.0, 0.0),
            fov_degrees: 45.0,
        }
    }
}

/// Anything that can present a frame of the world.
pub trait Renderer {
    type Output;

    fn render(&self, world: &World, components: &ComponentStore, view: &RenderView)
    -> Self::Output;
}

/// One line per entity with its name, position and z rotation.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World, components: &ComponentStore, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== frame {} (t={:.2}s) ===",
            world.tick(),
            world.time()
        );
        let _ = writeln!(
            out,
            "camera eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1})",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z
        );
        for (id, data) in world.entities() {
            let name = components.get_name(*id).map_or("-", |n| n.0.as_str());
            let p = data.transform.position;
            let (_, _, angle) = data.transform.rotation.to_euler(glam::EulerRot::XYZ);
            let _ = writeln!(
                out,
                "  {id:>4} {name:<10} pos=({:.2}, {:.2}) angle={:.2}",
                p.x, p.y, angle
            );
        }
        tracing::trace!(tick = world.tick(), entities = world.entity_count(), "debug frame");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_common::Transform;

    #[test]
    fn empty_world_header() {
        let out = DebugTextRenderer::new().render(
            &World::new(),
            &ComponentStore::new(),
            &RenderView::default(),
        );
        assert!(out.starts_with("=== frame 0 (t=0.00s) ==="));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn lists_named_entities() {
        let mut world = World::new();
        let mut components = ComponentStore::new();
        let goon = world.spawn(Transform::planar(1.0, 2.5, 0.0));
        components.set_name(goon, "Goon".into());
        world.spawn(Transform::default());

        let out = DebugTextRenderer::new().render(&world, &components, &RenderView::default());
        assert!(out.contains("Goon"));
        assert!(out.contains("pos=(1.00, 2.50)"));
        assert!(out.contains(" - "));
    }

    #[test]
    fn default_view_is_side_on() {
        let view = RenderView::default();
        assert_eq!(view.eye.x, view.target.x);
        assert_eq!(view.eye.y, view.target.y);
        assert!(view.eye.z > view.target.z);
    }
}
