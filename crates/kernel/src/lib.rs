//! World Kernel: entity transforms, frame clock, and the system event bus.
//!
//! # Invariants
//! - Entity ids are allocated sequentially; iteration order is spawn order.
//! - Every transform write marks the entity as updated until drained.
//! - Bus events are delivered in emission order.

pub mod bus;
pub mod world;

pub use bus::SystemBus;
pub use world::{EntityData, World};
