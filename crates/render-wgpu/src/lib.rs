//! wgpu render backend for the platformer.
//!
//! The scene lives in the x-y plane and is viewed from +z by a
//! [`SideCamera`]. Every entity with a renderable is drawn as one instance
//! of a unit cube, shaped by its mesh and coloured by its material.
//!
//! # Invariants
//! - The renderer never mutates the world.
//! - Pipelines are built once in [`WgpuRenderer::new`]; material colours are
//!   resolved once in [`WgpuRenderer::prepare_materials`].

mod camera;
mod gpu;
mod instances;
mod shaders;

pub use camera::SideCamera;
pub use gpu::WgpuRenderer;
pub use instances::{Palette, instance_model};
