//! 2D physics for the platformer, backed by `rapier2d`.
//!
//! We own the rapier pipeline and step it once per frame. The scene is
//! built from a [`SceneLayout`] (where things start) and [`PhysicsTuning`]
//! (how they move); callers read back one [`Pose2`](platformer_common::Pose2)
//! per body to drive rendered entities.
//!
//! # Invariants
//! - One `step` per frame with a fixed timestep.
//! - User forces are cleared every frame before the pull force is applied.
//! - Friction is decided per contact pair by the material table, not by
//!   per-collider coefficients.

mod layout;
mod material;
mod motion;
mod scene;

pub use layout::{PhysicsTuning, SceneLayout};
pub use material::{ContactMaterial, MaterialTable, SurfaceMaterial};
pub use motion::{motor_speed_for, platform_velocity, pull_force};
pub use scene::{BodyRole, PhysicsScene, StepReport};

#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
    #[error("scene layout needs {expected} wheel anchors, got {got}")]
    WheelCount { expected: usize, got: usize },
}
