//! Platformer gameplay.
//!
//! [`Game`] owns the physics scene, the key state and the system bus. Each
//! frame it steps physics and writes every bound body's pose into the
//! matching world entity. Entities are found by name once at setup and
//! paired with bodies by index.
//!
//! The crate also carries the session plumbing around the game: the client
//! capability check, the loading phases and the YAML [`GameConfig`].

mod animator;
mod capability;
mod config;
mod game;
mod loading;

pub use animator::{GoonAnimator, GoonClip};
pub use capability::{CapabilityError, ClientKind, ClientProfile, check_client};
pub use config::GameConfig;
pub use game::{Binding, Game};
pub use loading::{LoadPhase, ROOT_BUNDLE, load_project};

use platformer_assets::AssetError;
use platformer_physics::PhysicsError;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("physics: {0}")]
    Physics(#[from] PhysicsError),
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}
