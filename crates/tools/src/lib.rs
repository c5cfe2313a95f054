//! Developer tooling.
//!
//! # Invariants
//! - Inspection is read-only.

mod inspector;

pub use inspector::{EntityInfo, WorldInspector, WorldSummary};
