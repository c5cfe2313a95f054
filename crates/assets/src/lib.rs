//! Scene bundles and the asset registry.
//!
//! A bundle is a JSON object mapping refs to configs. Loading it yields the
//! project, the canvas configuration for the main scene, and the entities
//! the scene declares. Meshes and materials referenced by entities are
//! registered in a content-addressed [`AssetStore`]; the renderer consumes
//! them by handle, never by ref.

mod bundle;
mod canvas;
mod store;

pub use bundle::{
    Bundle, BundleLoader, EntityConfig, LoadedProject, MaterialConfig, MeshConfig,
    MeshRendererConfig, ProjectConfig, SceneConfig, TransformConfig, load_percent,
};
pub use canvas::CanvasConfig;
pub use store::{Asset, AssetId, AssetStore, Material, Mesh, MeshShape};

/// Errors from asset and bundle operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bundle root must be a JSON object")]
    NotAnObject,
    #[error("No project in bundle")]
    NoProject,
    #[error("missing ref in bundle: {0}")]
    MissingRef(String),
    #[error("invalid config for {reference}: {source}")]
    InvalidConfig {
        reference: String,
        source: serde_json::Error,
    },
}
