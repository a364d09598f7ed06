//! Loaded furniture models, cached per furniture type.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::mesh::{Mesh, DEFAULT_MATERIAL};
use crate::room::FurnitureType;
use crate::shading::Color;
use crate::transform::MeshFit;

/// Color for meshes that carry no materials at all.
pub const UNTEXTURED_COLOR: Color = Color::rgb(204, 204, 204);

/// Supplies meshes by model id. An empty mesh means the model is unavailable
/// and the primitive shapes are used instead.
pub trait MeshLoader {
    fn load(&self, model_id: &str) -> Mesh;
}

/// A mesh ready for placement, with its fit and per-material colors.
#[derive(Debug, Clone)]
pub struct FurnitureModel {
    pub mesh: Arc<Mesh>,
    pub fit: MeshFit,
    pub colors: HashMap<String, Color>,
}

impl FurnitureModel {
    pub fn new(mesh: Mesh, fit: MeshFit) -> Self {
        let mut colors: HashMap<String, Color> = mesh
            .materials
            .iter()
            .map(|(name, material)| (name.clone(), Color::from_unit_rgb(material.diffuse)))
            .collect();
        if colors.is_empty() {
            colors.insert(DEFAULT_MATERIAL.to_string(), UNTEXTURED_COLOR);
        }
        Self {
            mesh: Arc::new(mesh),
            fit,
            colors,
        }
    }

    /// Face color for a material, gray when the material is unknown.
    pub fn color_of(&self, material: &str) -> Color {
        self.colors.get(material).copied().unwrap_or(Color::GRAY)
    }
}

/// Session-wide model store.
#[derive(Debug, Default)]
pub struct ModelCache {
    models: HashMap<FurnitureType, FurnitureModel>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: FurnitureType, model: FurnitureModel) {
        self.models.insert(kind, model);
    }

    /// Loads `model_id` for `kind`. Returns false, leaving the cache
    /// untouched, when the loader yields an empty mesh.
    pub fn load(
        &mut self,
        kind: FurnitureType,
        loader: &dyn MeshLoader,
        model_id: &str,
        fit: MeshFit,
    ) -> bool {
        let mesh = loader.load(model_id);
        if mesh.is_empty() {
            debug!(%kind, model_id, "no mesh, keeping primitive shapes");
            return false;
        }
        info!(%kind, model_id, faces = mesh.faces.len(), "model loaded");
        self.insert(kind, FurnitureModel::new(mesh, fit));
        true
    }

    pub fn get(&self, kind: FurnitureType) -> Option<&FurnitureModel> {
        self.models.get(&kind)
    }

    pub fn contains(&self, kind: FurnitureType) -> bool {
        self.models.contains_key(&kind)
    }

    pub fn remove(&mut self, kind: FurnitureType) -> Option<FurnitureModel> {
        self.models.remove(&kind)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vec3;
    use crate::mesh::{Face, Material};

    struct FixedLoader;

    impl MeshLoader for FixedLoader {
        fn load(&self, model_id: &str) -> Mesh {
            if model_id != "table" {
                return Mesh::new();
            }
            let mut mesh = Mesh::new();
            mesh.vertices = vec![
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            ];
            mesh.faces.push(Face::new(vec![0, 1, 2], "oak"));
            let mut oak = Material::default();
            oak.diffuse = [1.0, 0.5, 0.0];
            mesh.materials.insert("oak".into(), oak);
            mesh
        }
    }

    #[test]
    fn test_load_caches_non_empty() {
        let mut cache = ModelCache::new();
        assert!(cache.load(FurnitureType::Table, &FixedLoader, "table", MeshFit::identity()));
        assert!(cache.contains(FurnitureType::Table));
        let model = cache.get(FurnitureType::Table).unwrap();
        assert_eq!(model.color_of("oak"), Color::rgb(255, 128, 0));
        assert_eq!(model.color_of("missing"), Color::GRAY);
    }

    #[test]
    fn test_empty_mesh_not_cached() {
        let mut cache = ModelCache::new();
        assert!(!cache.load(FurnitureType::Chair, &FixedLoader, "nothing", MeshFit::identity()));
        assert!(cache.is_empty());
        assert!(cache.get(FurnitureType::Chair).is_none());
    }

    #[test]
    fn test_untextured_default_color() {
        let mut mesh = Mesh::new();
        mesh.vertices = vec![Default::default(); 3];
        mesh.faces.push(Face::new(vec![0, 1, 2], DEFAULT_MATERIAL));
        let model = FurnitureModel::new(mesh, MeshFit::identity());
        assert_eq!(model.color_of(DEFAULT_MATERIAL), UNTEXTURED_COLOR);
    }

    #[test]
    fn test_remove() {
        let mut cache = ModelCache::new();
        cache.load(FurnitureType::Table, &FixedLoader, "table", MeshFit::identity());
        assert_eq!(cache.len(), 1);
        assert!(cache.remove(FurnitureType::Table).is_some());
        assert!(cache.is_empty());
    }
}
