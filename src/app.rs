use crate::core::error::{ConfigError, SetupError};
use crate::io::config::Config;
use crate::io::image::ImageCrateDecoder;
use crate::io::obj_loader::ObjSceneParser;
use crate::scene::context::{FiredReaction, Walkthrough};
use crate::scene::loader::{camera_from_config, init_walkthrough, load_objects, presets_from_config};
use crate::ui::input::{InputState, Key, ViewMode};
use log::{debug, info};
use nalgebra::Point3;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Loads every configured model and prints what it contains.
pub fn run_inspect(config: &Config, base_dir: &Path) -> Result<(), SetupError> {
    info!("Inspecting {} objects...", config.objects.len());
    let start_time = Instant::now();

    let objects = load_objects(config, base_dir, &ObjSceneParser, &ImageCrateDecoder)?;

    for obj in &objects {
        let model = &obj.model;
        println!(
            "{:<16} id={:<3} meshes={:<4} windows={:<3} textures={:<3} triangles={:<8} placements={}{}",
            obj.name,
            model.id,
            model.meshes.len(),
            model.windows.len(),
            model.textures.loaded().len(),
            model.triangle_count(),
            obj.placements.len(),
            if model.is_empty() { "  (empty)" } else { "" },
        );
        for (mesh, is_window) in model
            .meshes
            .iter()
            .map(|m| (m, false))
            .chain(model.windows.iter().map(|m| (m, true)))
        {
            let samplers: Vec<String> = mesh
                .sampler_bindings()
                .into_iter()
                .map(|(name, tex)| format!("{}={}", name, tex.handle.id()))
                .collect();
            debug!(
                "  {} '{}': {} floats, bounds {:?}, samplers [{}]",
                if is_window { "window" } else { "mesh" },
                mesh.name,
                mesh.interleaved().len(),
                mesh.bounds(),
                samplers.join(", ")
            );
        }
    }

    info!("Inspection completed in {:.2?}", start_time.elapsed());
    Ok(())
}

/// Prints the preset viewpoints and their view matrices.
pub fn run_views(config: &Config) -> Result<(), ConfigError> {
    let presets = presets_from_config(&config.camera)?;
    let mut camera = camera_from_config(&config.camera);

    for (i, preset) in presets.iter().enumerate() {
        camera.apply_preset(preset);
        let front = camera.front();
        println!(
            "[{}] {:<14} position=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} front=({:.3}, {:.3}, {:.3}){}",
            i,
            preset.name,
            preset.position.x,
            preset.position.y,
            preset.position.z,
            preset.yaw,
            preset.pitch,
            front.x,
            front.y,
            front.z,
            if camera.check_collision(&preset.position) {
                ""
            } else {
                "  (outside bounds)"
            },
        );
        println!("{}", camera.view_matrix());
    }
    Ok(())
}

/// Recorded input, one entry per frame (or run of identical frames).
#[derive(Debug, Default, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize)]
pub struct ReplayFrame {
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Keys held during the frame; everything else is released.
    #[serde(default)]
    pub keys: Vec<Key>,
    pub cursor: Option<[f32; 2]>,
    #[serde(default)]
    pub scroll: f32,
    /// Stencil id read back under the cursor; applied on the first repeat only.
    pub click: Option<u8>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_dt() -> f32 {
    1.0 / 60.0
}
fn default_repeat() -> u32 {
    1
}

impl ReplayScript {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub frames: usize,
    pub quit: bool,
    pub reactions: Vec<FiredReaction>,
    pub final_position: Point3<f32>,
    pub final_mode: ViewMode,
}

/// Drives `walkthrough` with a recorded script until it ends or Escape is held.
pub fn replay(walkthrough: &mut Walkthrough, script: &ReplayScript) -> ReplaySummary {
    let mut input = InputState::new();
    let mut frames = 0;
    let mut quit = false;
    let mut reactions = Vec::new();

    'script: for frame in &script.frames {
        for rep in 0..frame.repeat {
            input.set_held(frame.keys.iter().copied());
            if let Some([x, y]) = frame.cursor {
                input.set_cursor(x, y);
            }
            input.add_scroll(frame.scroll);
            if rep == 0
                && let Some(id) = frame.click
            {
                input.click(id);
            }

            let output = walkthrough.update(&input, frame.dt);
            input.end_frame();
            frames += 1;
            reactions.extend(output.reactions);

            if output.quit {
                quit = true;
                break 'script;
            }
        }
    }

    ReplaySummary {
        frames,
        quit,
        reactions,
        final_position: walkthrough.camera.position,
        final_mode: walkthrough.view_mode(),
    }
}

/// Loads the scene, plays `script` against it and logs the outcome.
pub fn run_replay(config: &Config, base_dir: &Path, script_path: &Path) -> Result<(), SetupError> {
    let script = ReplayScript::load(script_path)?;
    info!(
        "Replaying {} script entries from {:?}",
        script.frames.len(),
        script_path
    );

    let mut walkthrough = init_walkthrough(config, base_dir, &ObjSceneParser, &ImageCrateDecoder)?;
    let start_time = Instant::now();
    let summary = replay(&mut walkthrough, &script);

    for fired in &summary.reactions {
        println!(
            "reaction: id={} object={} {:?}",
            fired.pick_id,
            fired.object.as_deref().unwrap_or("-"),
            fired.reaction
        );
    }
    let p = summary.final_position;
    println!(
        "frames={} quit={} mode={:?} position=({:.3}, {:.3}, {:.3}) zoom={:.1} flashlight={} fog={}",
        summary.frames,
        summary.quit,
        summary.final_mode,
        p.x,
        p.y,
        p.z,
        walkthrough.camera.zoom,
        walkthrough.flashlight_on,
        walkthrough.fog.enabled,
    );
    println!("draw commands: {}", walkthrough.draw_list().len());

    info!("Replay completed in {:.2?}", start_time.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::camera::{CameraSettings, FlyCamera, PRESET_COUNT, PresetView};
    use crate::ui::input::CameraController;
    use crate::ui::interaction::{InteractionTable, Reaction};
    use nalgebra::Vector3;

    fn world() -> Walkthrough {
        let camera = FlyCamera::new(
            Point3::new(0.0, 1.0, 5.0),
            Vector3::y(),
            -90.0,
            0.0,
            CameraSettings::default(),
        );
        let presets: [PresetView; PRESET_COUNT] = std::array::from_fn(|i| PresetView {
            name: format!("p{i}"),
            position: Point3::new(i as f32, 2.0, 0.0),
            yaw: -90.0,
            pitch: 0.0,
        });
        let mut table = InteractionTable::new();
        table.add(3, Reaction::Sound { cue: "ding.wav".into() });
        Walkthrough::new(camera, CameraController::new(presets), Vec::new()).with_interactions(table)
    }

    #[test]
    fn script_parses_with_defaults() {
        let script: ReplayScript = toml::from_str(
            r#"
            [[frames]]
            keys = ["w", "left_shift"]
            repeat = 3

            [[frames]]
            click = 3
            cursor = [10.0, 20.0]
            "#,
        )
        .unwrap();
        assert_eq!(script.frames.len(), 2);
        assert_eq!(script.frames[0].keys, vec![Key::W, Key::LeftShift]);
        assert_eq!(script.frames[1].repeat, 1);
        assert!((script.frames[1].dt - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn replay_moves_clicks_and_stops_on_escape() {
        let script: ReplayScript = toml::from_str(
            r#"
            [[frames]]
            keys = ["w"]
            dt = 0.5
            repeat = 2

            [[frames]]
            click = 3
            repeat = 4

            [[frames]]
            keys = ["escape"]

            [[frames]]
            keys = ["right"]
            "#,
        )
        .unwrap();

        let mut w = world();
        let summary = replay(&mut w, &script);

        assert!(summary.quit);
        assert_eq!(summary.frames, 7);
        assert_eq!(summary.reactions.len(), 1);
        assert_eq!(summary.final_mode, ViewMode::FreeFly);
        assert!((summary.final_position.z - 2.5).abs() < 1e-4);
    }

    #[test]
    fn held_arrow_switches_preset_once() {
        let script: ReplayScript = toml::from_str(
            r#"
            [[frames]]
            keys = ["right"]
            repeat = 5
            "#,
        )
        .unwrap();

        let mut w = world();
        let summary = replay(&mut w, &script);
        assert_eq!(summary.final_mode, ViewMode::Preset(0));
        assert_eq!(summary.final_position, Point3::new(0.0, 2.0, 0.0));
    }
}
