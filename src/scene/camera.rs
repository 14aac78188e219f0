use crate::core::math::transform::TransformFactory;
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};

/// Number of preset viewpoints the camera cycles through.
pub const PRESET_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Walkable volume: `[-half_x, half_x] x [0, height] x [-half_z, half_z]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub half_x: f32,
    pub height: f32,
    pub half_z: f32,
}

impl SceneBounds {
    pub fn new(half_x: f32, height: f32, half_z: f32) -> Self {
        Self {
            half_x,
            height,
            half_z,
        }
    }

    /// Inclusive on every face.
    pub fn contains(&self, p: &Point3<f32>) -> bool {
        (-self.half_x..=self.half_x).contains(&p.x)
            && (0.0..=self.height).contains(&p.y)
            && (-self.half_z..=self.half_z).contains(&p.z)
    }
}

/// A fixed viewpoint the camera can snap to.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetView {
    pub name: String,
    pub position: Point3<f32>,
    pub yaw: f32,
    pub pitch: f32,
}

/// Tunables of the fly camera. Angles in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub speed: f32,
    pub boost_speed: f32,
    pub sensitivity: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub bounds: SceneBounds,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            speed: 2.5,
            boost_speed: 7.5,
            sensitivity: 0.1,
            zoom_min: 1.0,
            zoom_max: 45.0,
            pitch_min: -89.0,
            pitch_max: 89.0,
            bounds: SceneBounds::new(20.0, 10.0, 20.0),
        }
    }
}

/// Euler-angle first-person camera confined to a [`SceneBounds`] box.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Point3<f32>,
    pub world_up: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view, degrees.
    pub zoom: f32,
    pub settings: CameraSettings,

    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
}

impl FlyCamera {
    pub fn new(
        position: Point3<f32>,
        world_up: Vector3<f32>,
        yaw: f32,
        pitch: f32,
        settings: CameraSettings,
    ) -> Self {
        let zoom = settings.zoom_max;
        let pitch = pitch.clamp(settings.pitch_min, settings.pitch_max);
        let mut cam = Self {
            position,
            world_up,
            yaw,
            pitch,
            zoom,
            settings,
            front: -Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
        };
        cam.update_vectors();
        cam
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Moves along the view basis. The step is dropped entirely if it would
    /// leave the scene bounds.
    pub fn process_keyboard(&mut self, direction: MoveDirection, dt: f32, boosted: bool) {
        let speed = if boosted {
            self.settings.boost_speed
        } else {
            self.settings.speed
        };
        let step = speed * dt;

        let offset = match direction {
            MoveDirection::Forward => self.front * step,
            MoveDirection::Backward => -self.front * step,
            MoveDirection::Left => -self.right * step,
            MoveDirection::Right => self.right * step,
        };

        let proposed = self.position + offset;
        if self.check_collision(&proposed) {
            self.position = proposed;
        } else {
            debug!("Move to {:?} blocked by scene bounds", proposed);
        }
    }

    /// True when `pos` lies inside the walkable volume.
    pub fn check_collision(&self, pos: &Point3<f32>) -> bool {
        self.settings.bounds.contains(pos)
    }

    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.settings.sensitivity;
        self.pitch += dy * self.settings.sensitivity;

        if constrain_pitch {
            self.pitch = self
                .pitch
                .clamp(self.settings.pitch_min, self.settings.pitch_max);
        }

        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(self.settings.zoom_min, self.settings.zoom_max);
    }

    /// Snaps to a preset viewpoint, clamping its pitch. Zoom is left alone.
    pub fn apply_preset(&mut self, preset: &PresetView) {
        self.position = preset.position;
        self.yaw = preset.yaw;
        self.pitch = preset
            .pitch
            .clamp(self.settings.pitch_min, self.settings.pitch_max);
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        TransformFactory::view(&self.position, &(self.position + self.front), &self.up)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        TransformFactory::perspective(aspect_ratio, self.zoom.to_radians(), near, far)
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::transform_point;

    fn camera_at(x: f32, y: f32, z: f32, yaw: f32) -> FlyCamera {
        FlyCamera::new(
            Point3::new(x, y, z),
            Vector3::y(),
            yaw,
            0.0,
            CameraSettings::default(),
        )
    }

    #[test]
    fn collision_box_is_inclusive() {
        let cam = camera_at(0.0, 1.0, 0.0, -90.0);
        let b = cam.settings.bounds;
        let eps = 1e-3;

        assert!(cam.check_collision(&Point3::origin()));
        assert!(cam.check_collision(&Point3::new(b.half_x, 0.0, b.half_z)));
        assert!(cam.check_collision(&Point3::new(-b.half_x, b.height, -b.half_z)));
        assert!(!cam.check_collision(&Point3::new(b.half_x + eps, 1.0, 0.0)));
        assert!(!cam.check_collision(&Point3::new(0.0, 1.0, -b.half_z - eps)));
        assert!(!cam.check_collision(&Point3::new(0.0, -eps, 0.0)));
        assert!(!cam.check_collision(&Point3::new(0.0, b.height + eps, 0.0)));
    }

    #[test]
    fn forward_then_backward_returns_to_start() {
        let mut cam = camera_at(1.0, 1.5, -2.0, -60.0);
        cam.process_mouse_movement(0.0, 50.0, true);
        let start = cam.position;

        cam.process_keyboard(MoveDirection::Forward, 0.4, false);
        assert!((cam.position - start).norm() > 0.5);
        cam.process_keyboard(MoveDirection::Backward, 0.4, false);
        assert!((cam.position - start).norm() < 1e-5);
    }

    #[test]
    fn blocked_step_leaves_position_unchanged() {
        let mut cam = camera_at(19.9, 1.0, 0.0, 0.0);
        cam.process_keyboard(MoveDirection::Forward, 1.0, false);
        assert_eq!(cam.position, Point3::new(19.9, 1.0, 0.0));
    }

    #[test]
    fn boost_scales_the_step() {
        let mut cam = camera_at(0.0, 1.0, 0.0, 0.0);
        cam.process_keyboard(MoveDirection::Forward, 1.0, true);
        assert!((cam.position.x - 7.5).abs() < 1e-5);

        cam.process_keyboard(MoveDirection::Left, 1.0, false);
        assert!((cam.position.z + 2.5).abs() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped_when_constrained() {
        let mut cam = camera_at(0.0, 1.0, 0.0, -90.0);
        cam.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(cam.pitch, 89.0);

        cam.process_mouse_movement(0.0, -20_000.0, false);
        assert!(cam.pitch < -89.0);
    }

    #[test]
    fn basis_is_orthonormal() {
        let mut cam = camera_at(0.0, 1.0, 0.0, -90.0);
        cam.process_mouse_movement(123.0, -77.0, true);
        let (f, r, u) = (cam.front(), cam.right(), cam.up());
        for v in [f, r, u] {
            assert!((v.norm() - 1.0).abs() < 1e-5);
        }
        assert!(f.dot(&r).abs() < 1e-5);
        assert!(f.dot(&u).abs() < 1e-5);
        assert!(r.dot(&u).abs() < 1e-5);
    }

    #[test]
    fn scroll_clamps_exactly_at_bounds() {
        let mut cam = camera_at(0.0, 1.0, 0.0, -90.0);
        cam.process_mouse_scroll(100.0);
        assert_eq!(cam.zoom, 1.0);
        cam.process_mouse_scroll(-100.0);
        assert_eq!(cam.zoom, 45.0);
        cam.process_mouse_scroll(5.0);
        assert_eq!(cam.zoom, 40.0);
    }

    #[test]
    fn view_matrix_puts_front_on_negative_z() {
        let mut cam = camera_at(3.0, 2.0, 1.0, 30.0);
        cam.process_mouse_movement(0.0, -150.0, true);
        let ahead = cam.position + cam.front();
        let p = transform_point(&cam.view_matrix(), &ahead);
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn steep_presets_are_clamped_to_pitch_range() {
        let mut cam = FlyCamera::new(
            Point3::new(0.0, 1.0, 0.0),
            Vector3::y(),
            -90.0,
            95.0,
            CameraSettings::default(),
        );
        assert_eq!(cam.pitch, 89.0);

        cam.apply_preset(&PresetView {
            name: "attic".into(),
            position: Point3::new(0.0, 5.0, 0.0),
            yaw: -90.0,
            pitch: -90.0,
        });
        assert_eq!(cam.pitch, -89.0);
        assert!(cam.front().y > -1.0);
    }

    #[test]
    fn preset_snaps_pose() {
        let mut cam = camera_at(0.0, 1.0, 0.0, -90.0);
        cam.apply_preset(&PresetView {
            name: "kitchen".into(),
            position: Point3::new(-3.0, 1.6, -2.0),
            yaw: 0.0,
            pitch: 0.0,
        });
        assert_eq!(cam.position, Point3::new(-3.0, 1.6, -2.0));
        assert!((cam.front() - Vector3::x()).norm() < 1e-6);
    }
}
