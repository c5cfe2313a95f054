//! Keyboard input mapped to gameplay actions.
//!
//! # Invariants
//! - Button flags change only on key transitions; auto-repeat is ignored.
//! - Left and right are mutually exclusive while pressing; the most recent
//!   press wins.
//! - Every key release reports the resulting locomotion state.

pub mod action;
pub mod controls;

pub use action::Action;
pub use controls::{Buttons, Controls, Key};
