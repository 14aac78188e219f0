//! Renderer-agnostic scene graph produced by a [`SceneParser`].
//!
//! The importer only ever reads this structure; parsers are free to build it
//! from any interchange format.

use crate::core::error::SceneParseError;
use std::path::Path;

/// Post-processing a parser must apply before handing the graph over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Split every polygon into triangles.
    pub triangulate: bool,
    /// Flip the V texture coordinate (`v = 1 - v`).
    pub flip_uvs: bool,
    /// Generate per-vertex tangents and bitangents for textured meshes.
    pub calc_tangent_space: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            triangulate: true,
            flip_uvs: true,
            calc_tangent_space: true,
        }
    }
}

/// Texture slots as the source material names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Specular,
    /// Bump/height map slot.
    Height,
    Ambient,
}

/// Material data the importer cares about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMaterial {
    pub name: String,
    /// RGBA diffuse color, if the material defines one.
    pub diffuse_color: Option<[f32; 4]>,
    /// Texture paths per slot, in declaration order.
    pub textures: Vec<(TextureSlot, String)>,
}

impl SourceMaterial {
    pub fn texture_count(&self, slot: TextureSlot) -> usize {
        self.textures.iter().filter(|(s, _)| *s == slot).count()
    }

    pub fn textures_of(&self, slot: TextureSlot) -> impl Iterator<Item = &str> {
        self.textures
            .iter()
            .filter(move |(s, _)| *s == slot)
            .map(|(_, path)| path.as_str())
    }
}

/// A mesh payload with unified (single) indexing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// Empty when the source has no normals.
    pub normals: Vec<[f32; 3]>,
    /// First texture-coordinate channel, if any.
    pub texcoords: Option<Vec<[f32; 2]>>,
    /// Filled alongside `texcoords` when tangent space was requested.
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    /// Faces as index lists; triangles once triangulation ran.
    pub faces: Vec<Vec<u32>>,
    pub material_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    pub name: String,
    /// Indices into [`SceneGraph::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Total number of mesh references in this subtree.
    pub fn mesh_reference_count(&self) -> usize {
        self.meshes.len()
            + self
                .children
                .iter()
                .map(SceneNode::mesh_reference_count)
                .sum::<usize>()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    pub root: Option<SceneNode>,
    pub meshes: Vec<SourceMesh>,
    pub materials: Vec<SourceMaterial>,
    /// Set by parsers that could only read part of the file.
    pub incomplete: bool,
}

/// External scene-file parsing service.
pub trait SceneParser {
    fn parse(&self, path: &Path, options: &ImportOptions) -> Result<SceneGraph, SceneParseError>;
}
