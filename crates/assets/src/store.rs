use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

/// Primitive shape a mesh is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshShape {
    Box,
    Ball,
    /// Infinite ground; drawn as a wide slab whose top face sits at the
    /// entity origin.
    Plane,
}

impl MeshShape {
    fn tag(self) -> u8 {
        match self {
            Self::Box => 0,
            Self::Ball => 1,
            Self::Plane => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub shape: MeshShape,
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            base_color: [0.8, 0.8, 0.8, 1.0],
        }
    }
}

/// An asset entry in the registry.
#[derive(Debug, Clone)]
pub enum Asset {
    Mesh(Mesh),
    Material(Material),
}

/// Content-addressed asset registry.
///
/// Registering the same content twice yields the same id, so entities that
/// share a mesh or material in the bundle share one handle.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh and return its asset ID.
    pub fn register_mesh(&mut self, mesh: Mesh) -> AssetId {
        let id = hash_parts(&[mesh.name.as_bytes(), &[mesh.shape.tag()]]);
        self.assets.insert(id, Asset::Mesh(mesh));
        id
    }

    /// Register a material and return its asset ID.
    pub fn register_material(&mut self, material: Material) -> AssetId {
        let mut color = Vec::with_capacity(16);
        for c in material.base_color {
            color.extend_from_slice(&c.to_le_bytes());
        }
        let id = hash_parts(&[material.name.as_bytes(), &color]);
        self.assets.insert(id, Asset::Material(material));
        id
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn get_mesh(&self, id: AssetId) -> Option<&Mesh> {
        match self.assets.get(&id) {
            Some(Asset::Mesh(m)) => Some(m),
            _ => None,
        }
    }

    pub fn get_material(&self, id: AssetId) -> Option<&Material> {
        match self.assets.get(&id) {
            Some(Asset::Material(m)) => Some(m),
            _ => None,
        }
    }

    /// All registered materials, in id order.
    pub fn materials(&self) -> impl Iterator<Item = (AssetId, &Material)> {
        self.assets.iter().filter_map(|(id, a)| match a {
            Asset::Material(m) => Some((*id, m)),
            _ => None,
        })
    }

    pub fn meshes(&self) -> impl Iterator<Item = (AssetId, &Mesh)> {
        self.assets.iter().filter_map(|(id, a)| match a {
            Asset::Mesh(m) => Some((*id, m)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

fn hash_parts(parts: &[&[u8]]) -> AssetId {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_mesh() -> Mesh {
        Mesh {
            name: "crate".into(),
            shape: MeshShape::Box,
        }
    }

    #[test]
    fn register_mesh() {
        let mut store = AssetStore::new();
        let id = store.register_mesh(crate_mesh());
        assert_eq!(store.get_mesh(id).unwrap().shape, MeshShape::Box);
        assert!(store.get_material(id).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn content_addressed_dedup() {
        let mut store = AssetStore::new();
        let id1 = store.register_mesh(crate_mesh());
        let id2 = store.register_mesh(crate_mesh());
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn shape_changes_identity() {
        let mut store = AssetStore::new();
        let a = store.register_mesh(crate_mesh());
        let b = store.register_mesh(Mesh {
            shape: MeshShape::Ball,
            ..crate_mesh()
        });
        assert_ne!(a, b);
    }

    #[test]
    fn materials_iterates_only_materials() {
        let mut store = AssetStore::new();
        store.register_mesh(crate_mesh());
        let mat = store.register_material(Material::default());
        let listed: Vec<AssetId> = store.materials().map(|(id, _)| id).collect();
        assert_eq!(listed, vec![mat]);
        assert_eq!(store.meshes().count(), 1);
    }
}
