//! Shared types for the platformer workspace.

mod event;
mod types;

pub use event::GameEvent;
pub use types::{EntityId, Pose2, Transform};
