use crate::core::math::transform::TransformFactory;
use crate::scene::material::PhongMaterial;
use crate::scene::model::Model;
use nalgebra::{Matrix4, Vector3};

/// One placement of a model in the world. Rotation is Euler degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Placement {
    pub fn new(position: [f32; 3], rotation: [f32; 3], scale: [f32; 3]) -> Self {
        Self {
            position: Vector3::from(position),
            rotation: Vector3::from(rotation),
            scale: Vector3::from(scale),
        }
    }

    pub fn transform(&self) -> Matrix4<f32> {
        TransformFactory::placement(&self.position, &self.rotation, &self.scale)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new([0.0; 3], [0.0; 3], [1.0; 3])
    }
}

/// A named model with every place it is drawn.
#[derive(Debug)]
pub struct SceneObject {
    pub name: String,
    pub model: Model,
    pub placements: Vec<Placement>,
    pub material: Option<PhongMaterial>,
    /// Hidden objects are skipped by the draw list.
    pub hidden: bool,
    pub animating: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, model: Model, placements: Vec<Placement>) -> Self {
        Self {
            name: name.into(),
            model,
            placements,
            material: None,
            hidden: false,
            animating: false,
        }
    }

    pub fn pick_id(&self) -> u8 {
        self.model.id
    }

    pub fn is_drawable(&self) -> bool {
        !self.hidden && !self.model.is_empty() && !self.placements.is_empty()
    }
}
