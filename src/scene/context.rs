use crate::scene::camera::FlyCamera;
use crate::scene::light::{Attenuation, Light, PhongColors};
use crate::scene::material::PhongMaterial;
use crate::scene::mesh::MeshRecord;
use crate::scene::scene_object::SceneObject;
use crate::scene::texture::TextureCache;
use crate::ui::input::{CameraController, InputState, Key, ViewMode};
use crate::ui::interaction::{AudioSink, InteractionTable, LogAudioSink, Reaction};
use log::{debug, info};
use nalgebra::{Matrix4, Point3, Vector3};

/// Near/far planes and aspect ratio of the output surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Camera-attached spot light parameters. Cutoffs in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flashlight {
    pub colors: PhongColors,
    pub attenuation: Attenuation,
    pub cutoff: f32,
    pub outer_cutoff: f32,
}

impl Default for Flashlight {
    fn default() -> Self {
        Self {
            colors: PhongColors::new([0.0; 3], [1.0; 3], [1.0; 3]),
            attenuation: Attenuation::default(),
            cutoff: 12.5,
            outer_cutoff: 17.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub enabled: bool,
    pub color: Vector3<f32>,
    pub density: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Vector3::new(0.5, 0.5, 0.55),
            density: 0.05,
        }
    }
}

/// Everything the front end binds as per-frame uniforms.
#[derive(Debug, Clone)]
pub struct FrameUniforms {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub view_position: Point3<f32>,
    pub camera_direction: Vector3<f32>,
    pub lights: Vec<Light>,
    pub fog: Fog,
    pub clear_color: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshGroup {
    Structural,
    Windows,
}

/// One draw of one mesh group at one placement.
#[derive(Debug, Clone)]
pub struct DrawCommand<'a> {
    pub object: &'a str,
    pub transform: Matrix4<f32>,
    /// Stencil value to write; 0 leaves the stencil untouched. Window
    /// glass always carries 0 so clicks fall through to the structure.
    pub pick_id: u8,
    pub material: Option<PhongMaterial>,
    pub group: MeshGroup,
    pub meshes: &'a [MeshRecord],
    /// Resolves the texture handles referenced by `meshes`.
    pub textures: &'a TextureCache,
    /// Needs blending and must be drawn after every opaque command.
    pub translucent: bool,
}

/// A reaction that fired this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredReaction {
    pub pick_id: u8,
    pub object: Option<String>,
    pub reaction: Reaction,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameOutput {
    pub quit: bool,
    pub reactions: Vec<FiredReaction>,
}

/// Whole walkthrough state, threaded through the frame loop.
pub struct Walkthrough {
    pub camera: FlyCamera,
    pub controller: CameraController,
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
    pub flashlight: Flashlight,
    pub flashlight_on: bool,
    pub fog: Fog,
    pub projection: Projection,
    pub clear_color: Vector3<f32>,
    interactions: InteractionTable,
    audio: Box<dyn AudioSink>,
}

impl Walkthrough {
    pub fn new(camera: FlyCamera, controller: CameraController, objects: Vec<SceneObject>) -> Self {
        Self {
            camera,
            controller,
            objects,
            lights: Vec::new(),
            flashlight: Flashlight::default(),
            flashlight_on: false,
            fog: Fog::default(),
            projection: Projection::default(),
            clear_color: Vector3::new(0.1, 0.1, 0.1),
            interactions: InteractionTable::new(),
            audio: Box::new(LogAudioSink),
        }
    }

    pub fn with_interactions(mut self, interactions: InteractionTable) -> Self {
        self.interactions = interactions;
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    pub fn interactions(&self) -> &InteractionTable {
        &self.interactions
    }

    pub fn view_mode(&self) -> ViewMode {
        self.controller.mode()
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Advances one frame. The caller ends the input frame afterwards.
    pub fn update(&mut self, input: &InputState, dt: f32) -> FrameOutput {
        if input.just_pressed(Key::L) {
            self.flashlight_on = !self.flashlight_on;
            info!("Flashlight: {}", on_off(self.flashlight_on));
        }
        if input.just_pressed(Key::F) {
            self.fog.enabled = !self.fog.enabled;
            info!("Fog: {}", on_off(self.fog.enabled));
        }

        self.controller.update(input, &mut self.camera, dt);

        let reactions = match input.clicked() {
            Some(id) => self.handle_click(id),
            None => Vec::new(),
        };

        FrameOutput {
            quit: input.is_down(Key::Escape),
            reactions,
        }
    }

    /// Runs every reaction registered for `pick_id`.
    pub fn handle_click(&mut self, pick_id: u8) -> Vec<FiredReaction> {
        if pick_id == 0 {
            debug!("Clicked background");
            return Vec::new();
        }

        let target = self.objects.iter().position(|o| o.pick_id() == pick_id);
        let object = target.map(|i| self.objects[i].name.clone());
        let reactions = self.interactions.reactions_for(pick_id).to_vec();
        if reactions.is_empty() {
            info!("Clicked object {} ({:?}), nothing happens", pick_id, object);
            return Vec::new();
        }

        let mut fired = Vec::with_capacity(reactions.len());
        for reaction in reactions {
            info!("Clicked object {} ({:?}): {:?}", pick_id, object, reaction);
            if let Some(cue) = reaction.cue() {
                self.audio.play(cue);
            }
            match (&reaction, target) {
                (Reaction::Tear { .. }, Some(i)) => self.objects[i].hidden = true,
                (Reaction::Animate, Some(i)) => self.objects[i].animating = true,
                _ => {}
            }
            fired.push(FiredReaction {
                pick_id,
                object: object.clone(),
                reaction,
            });
        }
        fired
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        let mut lights = self.lights.clone();
        if self.flashlight_on {
            lights.push(Light::new_spot(
                self.camera.position,
                self.camera.front(),
                self.flashlight.colors,
                self.flashlight.attenuation,
                self.flashlight.cutoff,
                self.flashlight.outer_cutoff,
            ));
        }

        let p = self.projection;
        FrameUniforms {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(p.aspect_ratio, p.near, p.far),
            view_position: self.camera.position,
            camera_direction: self.camera.front(),
            lights,
            fog: self.fog,
            clear_color: self.clear_color,
        }
    }

    /// Opaque structural meshes of every visible object first, then the
    /// translucent window meshes.
    pub fn draw_list(&self) -> Vec<DrawCommand<'_>> {
        let mut commands = Vec::new();
        for group in [MeshGroup::Structural, MeshGroup::Windows] {
            for obj in self.objects.iter().filter(|o| o.is_drawable()) {
                let meshes = match group {
                    MeshGroup::Structural => &obj.model.meshes,
                    MeshGroup::Windows => &obj.model.windows,
                };
                if meshes.is_empty() {
                    continue;
                }
                for placement in &obj.placements {
                    commands.push(DrawCommand {
                        object: &obj.name,
                        transform: placement.transform(),
                        pick_id: match group {
                            MeshGroup::Structural => obj.pick_id(),
                            MeshGroup::Windows => 0,
                        },
                        material: obj.material,
                        group,
                        meshes,
                        textures: &obj.model.textures,
                        translucent: group == MeshGroup::Windows,
                    });
                }
            }
        }
        commands
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
