use nalgebra::Vector3;

/// Per-object Phong parameters that replace the mesh's own material tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            ambient: Vector3::new(0.1, 0.1, 0.1),
            diffuse: Vector3::new(0.8, 0.8, 0.8),
            specular: Vector3::new(0.5, 0.5, 0.5),
            shininess: 32.0,
        }
    }
}

impl PhongMaterial {
    pub fn new(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            ambient: Vector3::from(ambient),
            diffuse: Vector3::from(diffuse),
            specular: Vector3::from(specular),
            // GLSL pow() is undefined for a zero exponent on a zero base.
            shininess: shininess.max(1.0),
        }
    }
}
