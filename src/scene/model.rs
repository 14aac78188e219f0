use crate::scene::mesh::MeshRecord;
use crate::scene::texture::TextureCache;
use std::path::PathBuf;

/// A loaded model file: structural meshes, window meshes and the textures
/// they share.
///
/// `id` is the stencil value written while drawing this model; `0` means the
/// model is not pickable.
#[derive(Debug)]
pub struct Model {
    pub id: u8,
    pub meshes: Vec<MeshRecord>,
    pub windows: Vec<MeshRecord>,
    pub textures: TextureCache,
    /// Directory texture paths are resolved against.
    pub directory: PathBuf,
}

impl Model {
    /// A model with nothing to draw. Also the result of a failed lenient load.
    pub fn empty(id: u8, directory: impl Into<PathBuf>) -> Self {
        Self {
            id,
            meshes: Vec::new(),
            windows: Vec::new(),
            textures: TextureCache::new(),
            directory: directory.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.windows.is_empty()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len() + self.windows.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes
            .iter()
            .chain(&self.windows)
            .map(MeshRecord::triangle_count)
            .sum()
    }
}
