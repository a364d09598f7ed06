/// Loads OBJ models from a directory on disk
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use roomview_core::obj::load_obj_with;
use roomview_core::{Mesh, MeshLoader};
use tracing::{debug, warn};

/// Resolves model ids to `<root>/<id>.obj`; material libraries are read
/// relative to the OBJ file.
#[derive(Debug, Clone)]
pub struct ObjDirectoryLoader {
    root: PathBuf,
}

impl ObjDirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, model_id: &str) -> PathBuf {
        self.root.join(format!("{model_id}.obj"))
    }

    pub fn read_mesh(&self, model_id: &str) -> Result<Mesh> {
        let path = self.path_for(model_id);
        let source = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let dir = path.parent().unwrap_or(&self.root).to_path_buf();
        let mesh = load_obj_with(&source, |library| {
            let library_path = dir.join(library);
            debug!(path = %library_path.display(), "reading material library");
            fs::read_to_string(library_path).ok()
        })
        .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(mesh)
    }
}

impl MeshLoader for ObjDirectoryLoader {
    fn load(&self, model_id: &str) -> Mesh {
        match self.read_mesh(model_id) {
            Ok(mesh) => mesh,
            Err(err) => {
                warn!(model_id, error = %format!("{err:#}"), "model unavailable");
                Mesh::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("roomview-{name}-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_loads_obj_and_materials() {
        let dir = scratch_dir("loader");
        fs::write(
            dir.join("stool.obj"),
            "mtllib stool.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl seat\nf 1 2 3\n",
        )
        .unwrap();
        fs::write(dir.join("stool.mtl"), "newmtl seat\nKd 1 0 0\n").unwrap();

        let loader = ObjDirectoryLoader::new(&dir);
        let mesh = loader.load("stool");
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.materials["seat"].diffuse, [1.0, 0.0, 0.0]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_or_broken_model_is_empty() {
        let dir = scratch_dir("broken");
        fs::write(dir.join("bad.obj"), "v 1 2 three\n").unwrap();
        let loader = ObjDirectoryLoader::new(&dir);
        assert!(loader.load("bad").is_empty());
        assert!(loader.load("absent").is_empty());
        assert!(loader.read_mesh("absent").is_err());
        fs::remove_dir_all(dir).unwrap();
    }
}
