use crate::scene::camera::{FlyCamera, MoveDirection, PRESET_COUNT, PresetView};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;

/// Keys the walkthrough reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    W,
    A,
    S,
    D,
    LeftShift,
    L,
    F,
    Escape,
    Left,
    Right,
}

/// Per-frame input snapshot fed by the front end.
///
/// Held keys persist across frames; scroll and click are consumed by
/// [`InputState::end_frame`].
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: HashSet<Key>,
    previous: HashSet<Key>,
    cursor: Option<(f32, f32)>,
    scroll: f32,
    click: Option<u8>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: Key, down: bool) {
        if down {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    /// Replaces the whole held-key set.
    pub fn set_held<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.held = keys.into_iter().collect();
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Released on the previous frame, pressed on this one.
    pub fn just_pressed(&self, key: Key) -> bool {
        self.held.contains(&key) && !self.previous.contains(&key)
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Some((x, y));
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    pub fn add_scroll(&mut self, dy: f32) {
        self.scroll += dy;
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Records a left click that read back `stencil_id` under the cursor.
    pub fn click(&mut self, stencil_id: u8) {
        self.click = Some(stencil_id);
    }

    pub fn clicked(&self) -> Option<u8> {
        self.click
    }

    pub fn end_frame(&mut self) {
        self.previous.clone_from(&self.held);
        self.scroll = 0.0;
        self.click = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    FreeFly,
    Preset(u8),
}

impl ViewMode {
    pub fn next(self) -> Self {
        match self {
            ViewMode::FreeFly => ViewMode::Preset(0),
            ViewMode::Preset(i) => ViewMode::Preset((i + 1) % PRESET_COUNT as u8),
        }
    }

    pub fn previous(self) -> Self {
        match self {
            ViewMode::FreeFly => ViewMode::Preset(0),
            ViewMode::Preset(i) => {
                let n = PRESET_COUNT as u8;
                ViewMode::Preset((i + n - 1) % n)
            }
        }
    }
}

const MOVE_KEYS: [(Key, MoveDirection); 4] = [
    (Key::W, MoveDirection::Forward),
    (Key::S, MoveDirection::Backward),
    (Key::A, MoveDirection::Left),
    (Key::D, MoveDirection::Right),
];

/// Translates input into camera motion and preset switches.
pub struct CameraController {
    mode: ViewMode,
    presets: [PresetView; PRESET_COUNT],
    last_cursor: Option<(f32, f32)>,
}

impl CameraController {
    pub fn new(presets: [PresetView; PRESET_COUNT]) -> Self {
        Self {
            mode: ViewMode::FreeFly,
            presets,
            last_cursor: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn presets(&self) -> &[PresetView; PRESET_COUNT] {
        &self.presets
    }

    pub fn update(&mut self, input: &InputState, camera: &mut FlyCamera, dt: f32) {
        // --- 1. Preset cycling (edge-triggered) ---
        let target = if input.just_pressed(Key::Right) {
            Some(self.mode.next())
        } else if input.just_pressed(Key::Left) {
            Some(self.mode.previous())
        } else {
            None
        };
        if let Some(mode) = target {
            self.enter(mode, camera);
        }

        // --- 2. Keyboard movement ---
        let boosted = input.is_down(Key::LeftShift);
        for (key, direction) in MOVE_KEYS {
            if input.is_down(key) {
                camera.process_keyboard(direction, dt, boosted);
            }
        }

        // --- 3. Mouse look ---
        if let Some((x, y)) = input.cursor() {
            if let Some((last_x, last_y)) = self.last_cursor {
                let dx = x - last_x;
                // Screen y grows downward.
                let dy = last_y - y;
                if dx != 0.0 || dy != 0.0 {
                    camera.process_mouse_movement(dx, dy, true);
                }
            }
            self.last_cursor = Some((x, y));
        }

        // --- 4. Scroll zoom ---
        if input.scroll() != 0.0 {
            camera.process_mouse_scroll(input.scroll());
        }
    }

    fn enter(&mut self, mode: ViewMode, camera: &mut FlyCamera) {
        if let ViewMode::Preset(i) = mode {
            let preset = &self.presets[i as usize];
            camera.apply_preset(preset);
            info!("Camera preset {} ({})", i, preset.name);
        }
        debug!("View mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.last_cursor = None;
    }
}
