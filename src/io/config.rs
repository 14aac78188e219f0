use crate::core::error::ConfigError;
use crate::scene::camera::PRESET_COUNT;
use crate::scene::windows::HOUSE_WINDOW_NAMES;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_window_names")]
    pub window_names: Vec<String>,
    #[serde(default = "default_lights")]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub flashlight: FlashlightConfig,
    #[serde(default)]
    pub fog: FogConfig,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub interactions: Vec<InteractionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            window_names: default_window_names(),
            lights: default_lights(),
            flashlight: FlashlightConfig::default(),
            fog: FogConfig::default(),
            objects: default_objects(),
            interactions: Vec::new(),
        }
    }
}

fn default_window_names() -> Vec<String> {
    HOUSE_WINDOW_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_lights() -> Vec<LightConfig> {
    vec![
        LightConfig {
            kind: LightKind::Directional,
            position: None,
            direction: Some([-0.2, -1.0, -0.3]),
            ambient: [0.15, 0.15, 0.15],
            diffuse: [0.6, 0.6, 0.55],
            specular: [0.5, 0.5, 0.5],
            attenuation: default_attenuation(),
            cutoff: default_cutoff(),
            outer_cutoff: default_outer_cutoff(),
        },
        LightConfig {
            kind: LightKind::Point,
            position: Some([0.0, 2.8, 0.0]),
            direction: None,
            ambient: [0.05, 0.05, 0.05],
            diffuse: [0.8, 0.7, 0.5],
            specular: [1.0, 1.0, 1.0],
            attenuation: default_attenuation(),
            cutoff: default_cutoff(),
            outer_cutoff: default_outer_cutoff(),
        },
    ]
}

fn default_objects() -> Vec<ObjectConfig> {
    vec![ObjectConfig {
        name: "house".to_string(),
        path: "assets/house/house.obj".to_string(),
        id: 1,
        material: None,
        hidden: false,
        placements: default_placements(),
    }]
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            near: default_near(),
            far: default_far(),
            clear_color: default_clear_color(),
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_clear_color() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_world_up")]
    pub world_up: [f32; 3],
    #[serde(default = "default_yaw")]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_boost_speed")]
    pub boost_speed: f32,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    #[serde(default = "default_zoom_min")]
    pub zoom_min: f32,
    #[serde(default = "default_zoom")]
    pub zoom_max: f32,
    #[serde(default = "default_pitch_min")]
    pub pitch_min: f32,
    #[serde(default = "default_pitch_max")]
    pub pitch_max: f32,
    /// Half extents in x and z, full height in y.
    #[serde(default = "default_bounds")]
    pub bounds: [f32; 3],
    #[serde(default = "default_presets")]
    pub presets: Vec<PresetConfig>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            world_up: default_world_up(),
            yaw: default_yaw(),
            pitch: 0.0,
            speed: default_speed(),
            boost_speed: default_boost_speed(),
            sensitivity: default_sensitivity(),
            zoom: default_zoom(),
            zoom_min: default_zoom_min(),
            zoom_max: default_zoom(),
            pitch_min: default_pitch_min(),
            pitch_max: default_pitch_max(),
            bounds: default_bounds(),
            presets: default_presets(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 1.7, 8.0]
}
fn default_world_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_yaw() -> f32 {
    -90.0
}
fn default_speed() -> f32 {
    2.5
}
fn default_boost_speed() -> f32 {
    7.5
}
fn default_sensitivity() -> f32 {
    0.1
}
fn default_zoom() -> f32 {
    45.0
}
fn default_zoom_min() -> f32 {
    1.0
}
fn default_pitch_min() -> f32 {
    -89.0
}
fn default_pitch_max() -> f32 {
    89.0
}
fn default_bounds() -> [f32; 3] {
    [20.0, 10.0, 20.0]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresetConfig {
    #[serde(default)]
    pub name: String,
    pub position: [f32; 3],
    #[serde(default = "default_yaw")]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

fn default_presets() -> Vec<PresetConfig> {
    let preset = |name: &str, position, yaw, pitch| PresetConfig {
        name: name.to_string(),
        position,
        yaw,
        pitch,
    };
    vec![
        preset("front yard", [0.0, 2.0, 14.0], -90.0, -5.0),
        preset("garden", [12.0, 3.0, 6.0], -150.0, -10.0),
        preset("living room", [1.5, 1.6, 1.0], -120.0, 0.0),
        preset("kitchen", [-3.0, 1.6, -2.0], 30.0, -15.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    #[serde(rename = "type")]
    pub kind: LightKind,
    pub position: Option<[f32; 3]>,
    pub direction: Option<[f32; 3]>,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_specular")]
    pub specular: [f32; 3],
    /// Constant, linear, quadratic.
    #[serde(default = "default_attenuation")]
    pub attenuation: [f32; 3],
    /// Spot inner cone, degrees.
    #[serde(default = "default_cutoff")]
    pub cutoff: f32,
    #[serde(default = "default_outer_cutoff")]
    pub outer_cutoff: f32,
}

fn default_ambient() -> [f32; 3] {
    [0.05, 0.05, 0.05]
}
fn default_diffuse() -> [f32; 3] {
    [0.8, 0.8, 0.8]
}
fn default_specular() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_attenuation() -> [f32; 3] {
    [1.0, 0.09, 0.032]
}
fn default_cutoff() -> f32 {
    12.5
}
fn default_outer_cutoff() -> f32 {
    17.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlashlightConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ambient: [f32; 3],
    #[serde(default = "default_specular")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_specular")]
    pub specular: [f32; 3],
    #[serde(default = "default_attenuation")]
    pub attenuation: [f32; 3],
    #[serde(default = "default_cutoff")]
    pub cutoff: f32,
    #[serde(default = "default_outer_cutoff")]
    pub outer_cutoff: f32,
}

impl Default for FlashlightConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ambient: [0.0; 3],
            diffuse: default_specular(),
            specular: default_specular(),
            attenuation: default_attenuation(),
            cutoff: default_cutoff(),
            outer_cutoff: default_outer_cutoff(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FogConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_fog_color")]
    pub color: [f32; 3],
    #[serde(default = "default_fog_density")]
    pub density: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: default_fog_color(),
            density: default_fog_density(),
        }
    }
}

fn default_fog_color() -> [f32; 3] {
    [0.5, 0.5, 0.55]
}
fn default_fog_density() -> f32 {
    0.05
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    pub path: String,
    /// Stencil pick id; 0 leaves the object unpickable.
    #[serde(default)]
    pub id: u8,
    pub material: Option<MaterialConfig>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_placements")]
    pub placements: Vec<PlacementConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlacementConfig {
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in degrees.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: default_scale(),
        }
    }
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_placements() -> Vec<PlacementConfig> {
    vec![PlacementConfig::default()]
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_material_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_material_specular")]
    pub specular: [f32; 3],
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

fn default_material_ambient() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}
fn default_material_specular() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}
fn default_shininess() -> f32 {
    32.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionConfig {
    pub object: Option<String>,
    pub id: Option<u8>,
    pub reaction: ReactionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReactionConfig {
    Sound { cue: String },
    Tear { cue: String },
    Animate,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if cam.presets.len() != PRESET_COUNT {
            return Err(ConfigError::Invalid(format!(
                "expected {} camera presets, found {}",
                PRESET_COUNT,
                cam.presets.len()
            )));
        }
        if cam.pitch_min > cam.pitch_max {
            return Err(ConfigError::Invalid(format!(
                "pitch range [{}, {}] is reversed",
                cam.pitch_min, cam.pitch_max
            )));
        }
        let pitch_range = cam.pitch_min..=cam.pitch_max;
        if !pitch_range.contains(&cam.pitch) {
            return Err(ConfigError::Invalid(format!(
                "camera pitch {} is outside [{}, {}]",
                cam.pitch, cam.pitch_min, cam.pitch_max
            )));
        }
        if let Some(p) = cam.presets.iter().find(|p| !pitch_range.contains(&p.pitch)) {
            return Err(ConfigError::Invalid(format!(
                "preset '{}' pitch {} is outside [{}, {}]",
                p.name, p.pitch, cam.pitch_min, cam.pitch_max
            )));
        }
        if cam.zoom_min > cam.zoom_max {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is reversed",
                cam.zoom_min, cam.zoom_max
            )));
        }

        for light in &self.lights {
            let complete = match light.kind {
                LightKind::Directional => light.direction.is_some(),
                LightKind::Point => light.position.is_some(),
                LightKind::Spot => light.position.is_some() && light.direction.is_some(),
            };
            if !complete {
                return Err(ConfigError::Invalid(format!(
                    "{:?} light is missing its position or direction",
                    light.kind
                )));
            }
        }

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for obj in &self.objects {
            if !names.insert(obj.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate object name '{}'",
                    obj.name
                )));
            }
            if obj.id != 0 && !ids.insert(obj.id) {
                return Err(ConfigError::Invalid(format!(
                    "pick id {} is used by more than one object",
                    obj.id
                )));
            }
        }

        for interaction in &self.interactions {
            match (&interaction.object, interaction.id) {
                (Some(name), _) if !names.contains(name.as_str()) => {
                    return Err(ConfigError::Invalid(format!(
                        "interaction references unknown object '{}'",
                        name
                    )));
                }
                (None, None) => {
                    return Err(ConfigError::Invalid(
                        "interaction needs an object name or a pick id".to_string(),
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Pick id of the object an interaction targets. A name wins over a raw id.
    pub fn interaction_target(&self, interaction: &InteractionConfig) -> Option<u8> {
        match &interaction.object {
            Some(name) => self.objects.iter().find(|o| &o.name == name).map(|o| o.id),
            None => interaction.id,
        }
    }
}
