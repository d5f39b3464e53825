//! Asset references handed to the icon pipeline

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::{AssetError, ObjLoader};
use crate::render::material::Material;
use crate::scene::object::SceneObject;

/// Something that can produce a fresh renderable instance on demand
///
/// Every call must return an independent object: the pipeline poses and then
/// discards what it receives, so the source itself is never mutated.
pub trait AssetSource: Send + Sync + fmt::Debug {
    /// Build a new instance of the asset
    fn instantiate(&self) -> Result<SceneObject, AssetError>;
}

/// An in-memory prototype is instantiated by cloning it
impl AssetSource for SceneObject {
    fn instantiate(&self) -> Result<SceneObject, AssetError> {
        Ok(self.clone())
    }
}

/// Wavefront OBJ file on disk, loaded each time it is instantiated
#[derive(Debug, Clone)]
pub struct ObjFileSource {
    path: PathBuf,
    material: Material,
}

impl ObjFileSource {
    /// Create a source for the given file with a flat material
    pub fn new(path: impl Into<PathBuf>, material: Material) -> Self {
        Self {
            path: path.into(),
            material,
        }
    }

    /// Path of the OBJ file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssetSource for ObjFileSource {
    fn instantiate(&self) -> Result<SceneObject, AssetError> {
        if !self.path.exists() {
            return Err(AssetError::NotFound(self.path.display().to_string()));
        }
        let mesh = ObjLoader::load_obj(&self.path)?;
        let name = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(SceneObject::with_mesh(name, Arc::new(mesh), self.material.clone()))
    }
}

/// Named reference to a renderable asset
#[derive(Debug, Clone)]
pub struct IconAsset {
    /// Display name, also the output file stem
    pub name: String,
    source: Arc<dyn AssetSource>,
}

impl IconAsset {
    /// Create an asset from any source
    pub fn new(name: impl Into<String>, source: Arc<dyn AssetSource>) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    /// Asset backed by an in-memory prototype, named after the prototype
    pub fn from_prototype(prototype: SceneObject) -> Self {
        Self::new(prototype.name().to_string(), Arc::new(prototype))
    }

    /// Asset backed by an OBJ file, named after the file stem
    pub fn from_obj_file(path: impl AsRef<Path>, material: Material) -> Self {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(name, Arc::new(ObjFileSource::new(path, material)))
    }

    /// Produce a fresh instance
    pub fn instantiate(&self) -> Result<SceneObject, AssetError> {
        self.source.instantiate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesh::Mesh;
    use std::io::Write;

    #[test]
    fn test_prototype_instances_are_independent() {
        let prototype = SceneObject::with_mesh("Crate", Arc::new(Mesh::unit_cube()), Material::new());
        let asset = IconAsset::from_prototype(prototype);
        assert_eq!(asset.name, "Crate");

        let mut first = asset.instantiate().unwrap();
        first.root_mut().local.position.x = 9.0;
        let second = asset.instantiate().unwrap();
        assert_eq!(second.root().local.position.x, 0.0);
    }

    #[test]
    fn test_obj_asset_named_after_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barrel.obj");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();

        let asset = IconAsset::from_obj_file(&path, Material::new());
        assert_eq!(asset.name, "barrel");
        let instance = asset.instantiate().unwrap();
        assert_eq!(instance.world_parts().len(), 1);
    }

    #[test]
    fn test_missing_obj_is_not_found() {
        let asset = IconAsset::from_obj_file("/nonexistent/ghost.obj", Material::new());
        assert!(matches!(asset.instantiate(), Err(AssetError::NotFound(_))));
    }
}
