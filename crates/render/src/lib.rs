//! Renderer interface.
//!
//! # Invariants
//! - A renderer reads the world and components; it never writes them.
//! - What is drawn derives only from world state and the view.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
