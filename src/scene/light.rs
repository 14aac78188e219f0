use nalgebra::{Point3, Vector3};

/// Phong ambient/diffuse/specular triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongColors {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl PhongColors {
    pub fn new(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3]) -> Self {
        Self {
            ambient: Vector3::from(ambient),
            diffuse: Vector3::from(diffuse),
            specular: Vector3::from(specular),
        }
    }
}

/// Constant, linear and quadratic falloff terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl From<[f32; 3]> for Attenuation {
    fn from([constant, linear, quadratic]: [f32; 3]) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::from([1.0, 0.09, 0.032])
    }
}

/// A light source handed to the front end as uniforms.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Parallel rays; `direction` is the direction the light travels.
    Directional {
        direction: Vector3<f32>,
        colors: PhongColors,
    },
    Point {
        position: Point3<f32>,
        colors: PhongColors,
        attenuation: Attenuation,
    },
    /// Cone light. Cutoffs are stored as cosines of the half angles.
    Spot {
        position: Point3<f32>,
        direction: Vector3<f32>,
        colors: PhongColors,
        attenuation: Attenuation,
        cos_cutoff: f32,
        cos_outer_cutoff: f32,
    },
}

impl Light {
    pub fn new_directional(direction: Vector3<f32>, colors: PhongColors) -> Self {
        Self::Directional {
            direction: direction.normalize(),
            colors,
        }
    }

    pub fn new_point(position: Point3<f32>, colors: PhongColors, attenuation: Attenuation) -> Self {
        Self::Point {
            position,
            colors,
            attenuation,
        }
    }

    /// Cutoff angles in degrees.
    pub fn new_spot(
        position: Point3<f32>,
        direction: Vector3<f32>,
        colors: PhongColors,
        attenuation: Attenuation,
        cutoff_deg: f32,
        outer_cutoff_deg: f32,
    ) -> Self {
        Self::Spot {
            position,
            direction: direction.normalize(),
            colors,
            attenuation,
            cos_cutoff: cutoff_deg.to_radians().cos(),
            cos_outer_cutoff: outer_cutoff_deg.to_radians().cos(),
        }
    }
}
