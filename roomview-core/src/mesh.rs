//! Polygon meshes handed over by the model loader.

use std::collections::HashMap;

use crate::geometry::Vec3;

/// Name used for faces that appear before any `usemtl`.
pub const DEFAULT_MATERIAL: &str = "default";

/// Surface properties of a material library entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    /// Diffuse texture file; recorded, not rendered.
    pub texture_path: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.2, 0.2, 0.2],
            diffuse: [0.8, 0.8, 0.8],
            specular: [1.0, 1.0, 1.0],
            shininess: 0.0,
            texture_path: None,
        }
    }
}

/// A polygon referencing mesh vertices by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertex_indices: Vec<usize>,
    pub material_name: String,
}

impl Face {
    pub fn new(vertex_indices: Vec<usize>, material_name: impl Into<String>) -> Self {
        Self {
            vertex_indices,
            material_name: material_name.into(),
        }
    }

    /// At least 3 indices, all within `vertex_count`.
    pub fn is_valid(&self, vertex_count: usize) -> bool {
        self.vertex_indices.len() >= 3 && self.vertex_indices.iter().all(|&i| i < vertex_count)
    }
}

/// Vertices, faces and the materials they use.
///
/// An empty mesh (no faces) means "no model": the renderer falls back to
/// primitive shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub materials: HashMap<String, Material>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Faces that can be drawn, paired with their vertex positions.
    /// Malformed faces are left out.
    pub fn valid_faces(&self) -> impl Iterator<Item = (&Face, Vec<Vec3>)> + '_ {
        let count = self.vertices.len();
        self.faces.iter().filter(move |f| f.is_valid(count)).map(move |f| {
            let positions = f.vertex_indices.iter().map(|&i| self.vertices[i]).collect();
            (f, positions)
        })
    }

    /// Number of faces [`Mesh::valid_faces`] leaves out.
    pub fn invalid_face_count(&self) -> usize {
        let count = self.vertices.len();
        self.faces.iter().filter(|f| !f.is_valid(count)).count()
    }
}
