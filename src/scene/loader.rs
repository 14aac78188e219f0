use crate::core::error::{ConfigError, SetupError};
use crate::io::config::{CameraConfig, Config, LightKind, ReactionConfig};
use crate::scene::camera::{CameraSettings, FlyCamera, PRESET_COUNT, PresetView, SceneBounds};
use crate::scene::context::{Flashlight, Fog, Projection, Walkthrough};
use crate::scene::graph::SceneParser;
use crate::scene::importer::ModelImporter;
use crate::scene::light::{Light, PhongColors};
use crate::scene::material::PhongMaterial;
use crate::scene::scene_object::{Placement, SceneObject};
use crate::scene::texture::ImageDecoder;
use crate::scene::windows::WindowNames;
use crate::ui::input::CameraController;
use crate::ui::interaction::{InteractionTable, Reaction};
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use std::path::Path;

/// Rebuilds the static light list from config.
pub fn build_lights_from_config(config: &Config) -> Vec<Light> {
    let mut lights = Vec::with_capacity(config.lights.len());

    for l in &config.lights {
        let colors = PhongColors::new(l.ambient, l.diffuse, l.specular);
        let light = match (l.kind, l.position, l.direction) {
            (LightKind::Directional, _, Some(dir)) => {
                Light::new_directional(Vector3::from(dir), colors)
            }
            (LightKind::Point, Some(pos), _) => {
                Light::new_point(Point3::from(pos), colors, l.attenuation.into())
            }
            (LightKind::Spot, Some(pos), Some(dir)) => Light::new_spot(
                Point3::from(pos),
                Vector3::from(dir),
                colors,
                l.attenuation.into(),
                l.cutoff,
                l.outer_cutoff,
            ),
            _ => {
                warn!("Skipping incomplete {:?} light", l.kind);
                continue;
            }
        };
        lights.push(light);
    }
    lights
}

pub fn flashlight_from_config(config: &Config) -> Flashlight {
    let f = &config.flashlight;
    Flashlight {
        colors: PhongColors::new(f.ambient, f.diffuse, f.specular),
        attenuation: f.attenuation.into(),
        cutoff: f.cutoff,
        outer_cutoff: f.outer_cutoff,
    }
}

pub fn camera_from_config(cam: &CameraConfig) -> FlyCamera {
    let [bx, by, bz] = cam.bounds;
    let settings = CameraSettings {
        speed: cam.speed,
        boost_speed: cam.boost_speed,
        sensitivity: cam.sensitivity,
        zoom_min: cam.zoom_min,
        zoom_max: cam.zoom_max,
        pitch_min: cam.pitch_min,
        pitch_max: cam.pitch_max,
        bounds: SceneBounds::new(bx, by, bz),
    };

    let mut camera = FlyCamera::new(
        Point3::from(cam.position),
        Vector3::from(cam.world_up),
        cam.yaw,
        cam.pitch,
        settings,
    );
    camera.zoom = cam.zoom.clamp(cam.zoom_min, cam.zoom_max);

    if !camera.check_collision(&camera.position) {
        warn!(
            "Camera starts outside the scene bounds at {:?}; movement will be blocked",
            camera.position
        );
    }
    camera
}

pub fn presets_from_config(cam: &CameraConfig) -> Result<[PresetView; PRESET_COUNT], ConfigError> {
    let views: Vec<PresetView> = cam
        .presets
        .iter()
        .map(|p| PresetView {
            name: p.name.clone(),
            position: Point3::from(p.position),
            yaw: p.yaw,
            pitch: p.pitch,
        })
        .collect();

    views.try_into().map_err(|v: Vec<PresetView>| {
        ConfigError::Invalid(format!(
            "expected {} camera presets, found {}",
            PRESET_COUNT,
            v.len()
        ))
    })
}

pub fn interactions_from_config(config: &Config) -> InteractionTable {
    let mut table = InteractionTable::new();
    for interaction in &config.interactions {
        let Some(id) = config.interaction_target(interaction) else {
            warn!("Interaction {:?} has no target", interaction);
            continue;
        };
        if id == 0 {
            warn!(
                "Interaction on {:?} targets an unpickable object",
                interaction.object
            );
            continue;
        }
        let reaction = match &interaction.reaction {
            ReactionConfig::Sound { cue } => Reaction::Sound { cue: cue.clone() },
            ReactionConfig::Tear { cue } => Reaction::Tear { cue: cue.clone() },
            ReactionConfig::Animate => Reaction::Animate,
        };
        table.add(id, reaction);
    }
    table
}

/// An empty `window_names` list turns window classification off.
pub fn window_names_from_config(config: &Config) -> WindowNames {
    if config.window_names.is_empty() {
        info!("No window names configured, every mesh is structural");
        return WindowNames::empty();
    }
    WindowNames::new(config.window_names.iter().cloned())
}

/// Loads every configured object. Model paths are relative to `base_dir`.
///
/// A model whose scene file cannot be parsed becomes an empty object and is
/// never drawn; invalid image formats abort the whole load.
pub fn load_objects(
    config: &Config,
    base_dir: &Path,
    parser: &dyn SceneParser,
    decoder: &dyn ImageDecoder,
) -> Result<Vec<SceneObject>, SetupError> {
    let window_names = window_names_from_config(config);
    let importer = ModelImporter::new(parser, decoder, &window_names);

    let mut objects = Vec::with_capacity(config.objects.len());
    for obj_cfg in &config.objects {
        let model = importer.load_or_empty(base_dir.join(&obj_cfg.path), obj_cfg.id)?;
        if model.is_empty() {
            warn!("Object '{}' has nothing to draw", obj_cfg.name);
        }

        let placements = obj_cfg
            .placements
            .iter()
            .map(|p| Placement::new(p.position, p.rotation, p.scale))
            .collect();

        let mut object = SceneObject::new(obj_cfg.name.clone(), model, placements);
        object.material = obj_cfg
            .material
            .map(|m| PhongMaterial::new(m.ambient, m.diffuse, m.specular, m.shininess));
        object.hidden = obj_cfg.hidden;
        objects.push(object);
    }
    Ok(objects)
}

/// Builds the complete frame context for `config`.
pub fn init_walkthrough(
    config: &Config,
    base_dir: &Path,
    parser: &dyn SceneParser,
    decoder: &dyn ImageDecoder,
) -> Result<Walkthrough, SetupError> {
    config.validate()?;

    let camera = camera_from_config(&config.camera);
    let controller = CameraController::new(presets_from_config(&config.camera)?);
    let objects = load_objects(config, base_dir, parser, decoder)?;

    let mut walkthrough = Walkthrough::new(camera, controller, objects)
        .with_interactions(interactions_from_config(config));
    walkthrough.lights = build_lights_from_config(config);
    walkthrough.flashlight = flashlight_from_config(config);
    walkthrough.flashlight_on = config.flashlight.enabled;
    walkthrough.fog = Fog {
        enabled: config.fog.enabled,
        color: Vector3::from(config.fog.color),
        density: config.fog.density,
    };
    walkthrough.projection = Projection {
        aspect_ratio: config.render.aspect_ratio(),
        near: config.render.near,
        far: config.render.far,
    };
    walkthrough.clear_color = Vector3::from(config.render.clear_color);

    info!(
        "Walkthrough ready: {} objects, {} lights, {} interactions",
        walkthrough.objects.len(),
        walkthrough.lights.len(),
        walkthrough.interactions().len()
    );
    Ok(walkthrough)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::{InteractionConfig, LightConfig};

    #[test]
    fn lights_follow_their_kind() {
        let config = Config::from_toml(
            r#"
            [[lights]]
            type = "directional"
            direction = [0.0, -1.0, 0.0]

            [[lights]]
            type = "spot"
            position = [0.0, 3.0, 0.0]
            direction = [0.0, -1.0, 0.0]
            "#,
        )
        .unwrap();

        let lights = build_lights_from_config(&config);
        assert_eq!(lights.len(), 2);
        assert!(matches!(lights[0], Light::Directional { .. }));
        assert!(matches!(lights[1], Light::Spot { .. }));
    }

    #[test]
    fn unvalidated_incomplete_lights_are_skipped() {
        let mut config = Config::default();
        config.lights = vec![LightConfig {
            kind: LightKind::Spot,
            position: Some([0.0; 3]),
            direction: None,
            ambient: [0.0; 3],
            diffuse: [1.0; 3],
            specular: [1.0; 3],
            attenuation: [1.0, 0.0, 0.0],
            cutoff: 10.0,
            outer_cutoff: 15.0,
        }];
        assert!(build_lights_from_config(&config).is_empty());
    }

    #[test]
    fn camera_uses_config_tunables() {
        let mut cfg = CameraConfig::default();
        cfg.zoom = 80.0;
        cfg.bounds = [5.0, 3.0, 5.0];
        let camera = camera_from_config(&cfg);
        assert_eq!(camera.zoom, 45.0);
        assert!(!camera.check_collision(&Point3::new(6.0, 1.0, 0.0)));
        assert_eq!(camera.position, Point3::new(0.0, 1.7, 8.0));
    }

    #[test]
    fn preset_table_must_have_four_entries() {
        let mut cfg = CameraConfig::default();
        assert_eq!(presets_from_config(&cfg).unwrap()[3].name, "kitchen");
        cfg.presets.pop();
        assert!(presets_from_config(&cfg).is_err());
    }

    #[test]
    fn interactions_resolve_names_to_ids() {
        let mut config = Config::default();
        config.interactions = vec![
            InteractionConfig {
                object: Some("house".into()),
                id: None,
                reaction: ReactionConfig::Animate,
            },
            InteractionConfig {
                object: None,
                id: Some(7),
                reaction: ReactionConfig::Sound {
                    cue: "bell.wav".into(),
                },
            },
        ];

        let table = interactions_from_config(&config);
        assert_eq!(table.reactions_for(1), &[Reaction::Animate]);
        assert_eq!(table.reactions_for(7).len(), 1);
    }

    #[test]
    fn window_names_come_from_config() {
        let mut config = Config::default();
        let names = window_names_from_config(&config);
        assert!(names.is_window("Window_Cube.055"));

        config.window_names = vec!["Skylight".into()];
        let names = window_names_from_config(&config);
        assert_eq!(names.len(), 1);
        assert!(names.is_window("Skylight"));

        config.window_names.clear();
        let names = window_names_from_config(&config);
        assert!(names.is_empty());
        assert!(!names.is_window("Window_Cube.055"));
    }
}
