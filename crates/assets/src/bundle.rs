use crate::canvas::CanvasConfig;
use crate::store::{AssetStore, Material, Mesh, MeshShape};
use crate::AssetError;
use glam::{EulerRot, Quat, Vec3};
use platformer_common::Transform;
use platformer_ecs::{ComponentStore, MaterialHandle, MeshHandle, Renderable};
use platformer_kernel::World;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PROJECT_SUFFIX: &str = ".project";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub main_scene_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub canvas: Option<CanvasConfig>,
    #[serde(default)]
    pub entity_refs: Vec<String>,
}

/// Entity transform as authored: rotation is Euler XYZ in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
        }
    }
}

impl From<TransformConfig> for Transform {
    fn from(t: TransformConfig) -> Self {
        let [rx, ry, rz] = t.rotation.map(f32::to_radians);
        Transform {
            position: Vec3::from_array(t.translation),
            rotation: Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
            scale: Vec3::from_array(t.scale),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshRendererConfig {
    pub mesh_ref: String,
    pub material_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub mesh_renderer: Option<MeshRendererConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    pub id: String,
    pub shape: MeshShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub color: [f32; 4],
}

/// A parsed bundle: refs mapped to raw JSON configs, in the order the
/// bundle file lists them.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    refs: serde_json::Map<String, serde_json::Value>,
}

impl Bundle {
    pub fn from_json_str(text: &str) -> Result<Self, AssetError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Object(refs) = value else {
            return Err(AssetError::NotAnObject);
        };
        tracing::debug!(refs = refs.len(), "bundle parsed");
        Ok(Self { refs })
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.refs.contains_key(reference)
    }

    /// Deserialize the config stored under `reference`.
    pub fn config<T: DeserializeOwned>(&self, reference: &str) -> Result<T, AssetError> {
        let value = self
            .refs
            .get(reference)
            .ok_or_else(|| AssetError::MissingRef(reference.to_string()))?;
        T::deserialize(value).map_err(|source| AssetError::InvalidConfig {
            reference: reference.to_string(),
            source,
        })
    }

    /// The first `.project` ref as written in the bundle, if it carries an
    /// id.
    pub fn find_project(&self) -> Result<ProjectConfig, AssetError> {
        let key = self
            .refs
            .keys()
            .find(|k| k.ends_with(PROJECT_SUFFIX))
            .ok_or(AssetError::NoProject)?;
        let project: ProjectConfig = self.config(key).map_err(|_| AssetError::NoProject)?;
        if project.id.is_empty() {
            return Err(AssetError::NoProject);
        }
        Ok(project)
    }

    /// Canvas configuration of the project's main scene, or the default when
    /// the scene or its canvas block is absent.
    pub fn canvas_config(&self, project: &ProjectConfig) -> CanvasConfig {
        self.config::<SceneConfig>(&project.main_scene_ref)
            .ok()
            .and_then(|scene| scene.canvas)
            .unwrap_or_default()
    }
}

/// Summary of an instantiated project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub project: ProjectConfig,
    pub scene: SceneConfig,
    pub canvas: CanvasConfig,
    pub entity_count: usize,
}

/// Loads bundles from a resource directory and instantiates projects into
/// the world.
#[derive(Debug, Clone)]
pub struct BundleLoader {
    root_path: PathBuf,
}

impl BundleLoader {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Read and parse `root_path/name`.
    pub fn load_bundle(&self, name: &str) -> Result<Bundle, AssetError> {
        let path = self.root_path.join(name);
        tracing::info!(path = %path.display(), "loading bundle");
        let text = std::fs::read_to_string(&path)?;
        Bundle::from_json_str(&text)
    }

    /// Spawn every entity of the project's main scene.
    ///
    /// Meshes and materials are registered in `assets`; entities with a mesh
    /// renderer get a [`Renderable`] pointing at those handles. `progress`
    /// sees `(spawned, total)` once before the first entity and again after
    /// each one.
    pub fn instantiate(
        &self,
        bundle: &Bundle,
        project_id: &str,
        world: &mut World,
        components: &mut ComponentStore,
        assets: &mut AssetStore,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<LoadedProject, AssetError> {
        let project: ProjectConfig = bundle.config(project_id)?;
        let scene: SceneConfig = bundle.config(&project.main_scene_ref)?;

        // Resolve everything before spawning so a bad ref leaves the world untouched.
        let mut resolved = Vec::with_capacity(scene.entity_refs.len());
        for entity_ref in &scene.entity_refs {
            let entity: EntityConfig = bundle.config(entity_ref)?;
            let visual = match &entity.mesh_renderer {
                Some(mr) => {
                    let mesh: MeshConfig = bundle.config(&mr.mesh_ref)?;
                    let material: MaterialConfig = bundle.config(&mr.material_ref)?;
                    Some((mesh, material))
                }
                None => None,
            };
            resolved.push((entity, visual));
        }

        let total = resolved.len();
        progress(0, total);
        for (spawned, (entity, visual)) in resolved.into_iter().enumerate() {
            let id = world.spawn(entity.transform.into());
            components.set_name(id, entity.name.clone());
            if let Some((mesh, material)) = visual {
                let mesh_id = assets.register_mesh(Mesh {
                    name: mesh.id,
                    shape: mesh.shape,
                });
                let material_id = assets.register_material(Material {
                    name: material.name.unwrap_or(material.id),
                    base_color: material.color,
                });
                components.set_renderable(
                    id,
                    Renderable {
                        mesh: MeshHandle(mesh_id.0),
                        material: MaterialHandle(material_id.0),
                    },
                );
            }
            tracing::debug!(%id, name = %entity.name, "entity spawned");
            progress(spawned + 1, total);
        }

        let canvas = scene.canvas.unwrap_or_default();
        let entity_count = scene.entity_refs.len();
        tracing::info!(
            project = %project.id,
            scene = %scene.id,
            entities = entity_count,
            "project instantiated"
        );
        Ok(LoadedProject {
            project,
            scene,
            canvas,
            entity_count,
        })
    }
}

/// Whole-number load percentage for the progress bar.
pub fn load_percent(handled: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    (100.0 * handled as f64 / total as f64).round() as u32
}
