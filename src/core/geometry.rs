use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// One entry of the interleaved vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Number of `f32` components.
    pub components: usize,
    /// Offset from the start of the vertex, in floats.
    pub offset: usize,
}

/// A single vertex as produced by the scene importer.
///
/// Tangent and bitangent are only meaningful when the source mesh carried
/// texture coordinates; otherwise they stay zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Texture coordinates (UV).
    pub texcoord: Vector2<f32>,
    /// Diffuse tint of the owning mesh's material (RGBA).
    pub color: Vector4<f32>,
    /// 1.0 when the owning material has a diffuse texture, 0.0 otherwise.
    pub use_diffuse_texture: f32,
    /// Tangent vector for normal mapping.
    pub tangent: Vector3<f32>,
    /// Bitangent vector for normal mapping.
    pub bitangent: Vector3<f32>,
}

impl Vertex {
    /// Floats per interleaved vertex.
    pub const STRIDE: usize = 19;

    /// Interleaved layout written by [`Vertex::write_interleaved`].
    pub const ATTRIBUTES: [VertexAttribute; 7] = [
        VertexAttribute { location: 0, components: 3, offset: 0 },
        VertexAttribute { location: 1, components: 3, offset: 3 },
        VertexAttribute { location: 2, components: 2, offset: 6 },
        VertexAttribute { location: 3, components: 3, offset: 13 },
        VertexAttribute { location: 4, components: 3, offset: 16 },
        VertexAttribute { location: 5, components: 4, offset: 8 },
        VertexAttribute { location: 6, components: 1, offset: 12 },
    ];

    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            texcoord,
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            use_diffuse_texture: 0.0,
            tangent: Vector3::zeros(),
            bitangent: Vector3::zeros(),
        }
    }

    /// Appends this vertex to `out` in the order described by [`Vertex::ATTRIBUTES`].
    pub fn write_interleaved(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(self.position.coords.as_slice());
        out.extend_from_slice(self.normal.as_slice());
        out.extend_from_slice(self.texcoord.as_slice());
        out.extend_from_slice(self.color.as_slice());
        out.push(self.use_diffuse_texture);
        out.extend_from_slice(self.tangent.as_slice());
        out.extend_from_slice(self.bitangent.as_slice());
    }
}
