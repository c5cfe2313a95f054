use crate::GameError;
use platformer_physics::{PhysicsTuning, SceneLayout};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gameplay tuning, loaded from YAML.
///
/// Physics tuning keys sit at the top level (`jump_speed: 8.0`); body start
/// positions live under `layout`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    #[serde(flatten)]
    pub tuning: PhysicsTuning,
    /// World units per physics meter when writing entity transforms.
    pub render_scale: f32,
    pub layout: SceneLayout,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tuning: PhysicsTuning::default(),
            render_scale: 1.0,
            layout: SceneLayout::default(),
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, GameError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "game config loaded");
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, GameError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String, GameError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
