use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Identifier for an entity in the world.
///
/// Ids are handed out sequentially by the world, so ascending id order is
/// also spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform lying in the z = 0 plane, rotated by `angle` radians about z.
    pub fn planar(x: f32, y: f32, angle: f32) -> Self {
        Self {
            position: Vec3::new(x, y, 0.0),
            rotation: Quat::from_euler(EulerRot::XYZ, 0.0, 0.0, angle),
            scale: Vec3::ONE,
        }
    }

    /// Same as [`Transform::planar`] but keeps this transform's scale.
    pub fn with_planar(self, x: f32, y: f32, angle: f32) -> Self {
        Self {
            scale: self.scale,
            ..Self::planar(x, y, angle)
        }
    }
}

/// The two values read from a simulated body each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    pub position: Vec2,
    pub angle: f32,
}

impl Pose2 {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            angle,
        }
    }
}
