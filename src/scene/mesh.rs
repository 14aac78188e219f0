use crate::core::geometry::Vertex;
use crate::scene::texture::{TextureKind, TextureRef};
use nalgebra::Point3;

/// A renderer-ready sub-mesh extracted from a scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
    /// Name copied from the source mesh; drives window classification.
    pub name: String,
    pub vertices: Vec<Vertex>,
    /// Triangle list, 3 indices per face.
    pub indices: Vec<u32>,
    pub textures: Vec<TextureRef>,
}

impl MeshRecord {
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        textures: Vec<TextureRef>,
    ) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
            textures,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Flat vertex buffer in [`Vertex::ATTRIBUTES`] layout.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * Vertex::STRIDE);
        for vertex in &self.vertices {
            vertex.write_interleaved(&mut out);
        }
        out
    }

    /// Texture bindings with shader sampler names, numbered per kind from 1
    /// in the order the textures were resolved.
    pub fn sampler_bindings(&self) -> Vec<(String, &TextureRef)> {
        let mut counters = [0u32; 4];
        self.textures
            .iter()
            .map(|texture| {
                let slot = match texture.kind {
                    TextureKind::Diffuse => 0,
                    TextureKind::Specular => 1,
                    TextureKind::Normal => 2,
                    TextureKind::Height => 3,
                };
                counters[slot] += 1;
                (
                    format!("{}{}", texture.kind.uniform_prefix(), counters[slot]),
                    texture,
                )
            })
            .collect()
    }

    /// Axis-aligned bounds of the vertex positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        let (mut min, mut max) = (first, first);
        for vertex in &self.vertices[1..] {
            let p = vertex.position;
            min = Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Some((min, max))
    }
}
