//! Orbit/pan camera controller
//!
//! Accumulates pointer gestures into an orientation, a position and a scale,
//! and derives the matrices a renderer needs.
//!
//! # Conventions
//!
//! - Orientation is `(roll, yaw, pitch)` in degrees, stored in a [`Vec3`]
//!   as `(x, y, z)`.
//! - The scene is authored Z-up; [`CameraController::view_matrix`] remaps it
//!   to the Y-up clip convention.
//! - Drags are measured against a baseline snapshotted at the last button
//!   event, not accumulated per motion event.

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::config::CameraConfig;
use crate::input::{Modifiers, PointerButton, PointerEvent};

/// Drag mode of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Idle,
    Rotating,
    Translating,
}

#[derive(Debug, Clone)]
pub struct CameraController {
    orientation: Vec3,
    position: Vec3,
    scale: f32,
    baseline_orientation: Vec3,
    baseline_position: Vec3,
    baseline_cursor: Vec2,
    mode: CameraMode,
    config: CameraConfig,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        let orientation = Vec3::from_array(config.orientation);
        let position = Vec3::from_array(config.position);
        Self {
            orientation,
            position,
            scale: config.scale,
            baseline_orientation: orientation,
            baseline_position: position,
            baseline_cursor: Vec2::ZERO,
            mode: CameraMode::Idle,
            config,
        }
    }

    /// `(roll, yaw, pitch)` in degrees
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Vec3) {
        self.orientation = orientation;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Uniform world scale accumulated from scrolling (unclamped)
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_rotating(&self) -> bool {
        self.mode == CameraMode::Rotating
    }

    pub fn is_translating(&self) -> bool {
        self.mode == CameraMode::Translating
    }

    /// Feed one pointer event. Every event is consumed.
    pub fn handle(&mut self, event: &PointerEvent) -> bool {
        match *event {
            PointerEvent::Button {
                position,
                button,
                pressed,
                ..
            } => self.button(position, button, pressed),
            PointerEvent::Motion {
                position,
                modifiers,
                ..
            } => self.motion(position, modifiers),
            PointerEvent::Scroll { delta, .. } => {
                self.scale += delta.y * self.config.scroll_sensitivity;
            }
            PointerEvent::Drag { .. } | PointerEvent::Enter { .. } => {}
        }
        true
    }

    fn button(&mut self, position: Vec2, button: PointerButton, pressed: bool) {
        self.baseline_position = self.position;
        self.baseline_orientation = self.orientation;
        self.baseline_cursor = position;

        if !pressed {
            self.mode = CameraMode::Idle;
        } else if button == self.config.rotate_button {
            self.mode = CameraMode::Rotating;
        } else if button == self.config.translate_button {
            self.mode = CameraMode::Translating;
        }
    }

    fn motion(&mut self, position: Vec2, modifiers: Modifiers) {
        let delta = (position - self.baseline_cursor) * self.config.drag_sensitivity;
        match self.mode {
            CameraMode::Idle => {}
            CameraMode::Rotating => {
                self.orientation.y = self.baseline_orientation.y + delta.x;
                self.orientation.z = self.baseline_orientation.z + delta.y;
            }
            CameraMode::Translating => {
                self.position = self.translated(delta, modifiers);
            }
        }
    }

    fn translated(&self, delta: Vec2, modifiers: Modifiers) -> Vec3 {
        // Columns are the view axes expressed in world space
        let basis = Mat3::from_mat4(self.view_matrix() * self.world_matrix()).transpose();
        let base = self.baseline_position;

        if modifiers.is_empty() {
            base - (basis.x_axis * delta.x + basis.y_axis * delta.y)
        } else if modifiers == Modifiers::SHIFT {
            let mut forward = basis.z_axis;
            forward.z = 0.0;
            let forward = forward.normalize_or_zero();
            base - basis.x_axis * delta.x + forward * delta.y
        } else {
            base
        }
    }

    /// Perspective projection for a `width` x `height` pixel surface
    ///
    /// Y is flipped and `w` takes the view-space depth.
    pub fn projection_matrix(&self, width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let focal = height;
        Mat4::from_cols(
            Vec4::new(2.0 * focal / width, 0.0, 0.0, 0.0),
            Vec4::new(0.0, -2.0 * focal / height, 0.0, 0.0),
            Vec4::new(0.0, 0.0, (far + near) / (far - near), 1.0),
            Vec4::new(0.0, 0.0, 2.0 * far * near / (near - far), 0.0),
        )
    }

    /// Fixed Z-up to Y-up axis remap
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, -1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// World-to-camera transform, the inverse of the camera placement
    pub fn world_matrix(&self) -> Mat4 {
        let rotation = self.rotation();
        let inverse = rotation.transpose();
        let translation = -(inverse * self.position);
        Mat4::from_cols(
            inverse.x_axis.extend(0.0),
            inverse.y_axis.extend(0.0),
            inverse.z_axis.extend(0.0),
            translation.extend(1.0),
        )
    }

    /// Camera placement rotation: roll about Y, then pitch about X, then yaw about Z
    pub fn rotation(&self) -> Mat3 {
        let [roll, yaw, pitch] = self.orientation.to_array().map(f32::to_radians);
        Mat3::from_rotation_z(yaw) * Mat3::from_rotation_x(pitch) * Mat3::from_rotation_y(roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn press(button: PointerButton, x: f32, y: f32) -> PointerEvent {
        PointerEvent::Button {
            position: Vec2::new(x, y),
            button,
            pressed: true,
            modifiers: Modifiers::empty(),
        }
    }

    fn release(button: PointerButton, x: f32, y: f32) -> PointerEvent {
        PointerEvent::Button {
            position: Vec2::new(x, y),
            button,
            pressed: false,
            modifiers: Modifiers::empty(),
        }
    }

    fn move_to(x: f32, y: f32, modifiers: Modifiers) -> PointerEvent {
        PointerEvent::Motion {
            position: Vec2::new(x, y),
            delta: Vec2::ZERO,
            modifiers,
        }
    }

    fn level_camera() -> CameraController {
        CameraController::new(CameraConfig {
            orientation: [0.0, 0.0, 0.0],
            position: [0.0, 0.0, 0.0],
            ..CameraConfig::default()
        })
    }

    #[test]
    fn test_rotation_drag_moves_yaw() {
        let mut camera = CameraController::default();
        assert_eq!(camera.orientation(), Vec3::new(0.0, -45.0, -42.0));

        camera.handle(&press(PointerButton::Primary, 100.0, 100.0));
        assert_eq!(camera.mode(), CameraMode::Rotating);
        camera.handle(&move_to(110.0, 100.0, Modifiers::empty()));

        let orientation = camera.orientation();
        assert!((orientation.y - (-44.0)).abs() < EPS);
        assert!((orientation.z - (-42.0)).abs() < EPS);
        assert_eq!(orientation.x, 0.0);
    }

    #[test]
    fn test_rotation_is_relative_to_baseline() {
        let mut camera = level_camera();
        camera.handle(&press(PointerButton::Primary, 0.0, 0.0));
        camera.handle(&move_to(10.0, 20.0, Modifiers::empty()));
        camera.handle(&move_to(20.0, 40.0, Modifiers::empty()));

        let orientation = camera.orientation();
        assert!((orientation.y - 2.0).abs() < EPS);
        assert!((orientation.z - 4.0).abs() < EPS);
    }

    #[test]
    fn test_motion_while_idle_changes_nothing() {
        let mut camera = CameraController::default();
        camera.handle(&move_to(50.0, 50.0, Modifiers::empty()));
        assert_eq!(camera.orientation(), Vec3::new(0.0, -45.0, -42.0));
        assert_eq!(camera.position(), Vec3::new(-8.0, -8.0, 8.0));
    }

    #[test]
    fn test_plane_pan_stays_in_view_plane() {
        let mut camera = CameraController::default();
        let view_world = Mat3::from_mat4(camera.view_matrix() * camera.world_matrix());
        let start = camera.position();

        camera.handle(&press(PointerButton::Secondary, 0.0, 0.0));
        assert_eq!(camera.mode(), CameraMode::Translating);
        camera.handle(&move_to(30.0, -20.0, Modifiers::empty()));

        let moved = view_world * (camera.position() - start);
        assert!(moved.z.abs() < EPS);
        assert!((moved.x - (-3.0)).abs() < EPS);
        assert!((moved.y - 2.0).abs() < EPS);
    }

    #[test]
    fn test_plane_pan_with_zero_rotation() {
        let mut camera = level_camera();
        camera.handle(&press(PointerButton::Secondary, 0.0, 0.0));
        camera.handle(&move_to(10.0, 10.0, Modifiers::empty()));

        // View x is world x, view y is world -z
        assert!((camera.position() - Vec3::new(-1.0, 0.0, 1.0)).length() < EPS);
        let moved = Mat3::from_mat4(camera.view_matrix() * camera.world_matrix()) * camera.position();
        assert!(moved.z.abs() < EPS);
    }

    #[test]
    fn test_level_pan_keeps_height() {
        let mut camera = CameraController::default();
        let start = camera.position();

        camera.handle(&press(PointerButton::Secondary, 0.0, 0.0));
        camera.handle(&move_to(0.0, 50.0, Modifiers::SHIFT));

        let moved = camera.position() - start;
        assert!(moved.z.abs() < EPS);
        assert!((moved.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_modifier_keeps_baseline() {
        let mut camera = CameraController::default();
        let start = camera.position();
        camera.handle(&press(PointerButton::Secondary, 0.0, 0.0));
        camera.handle(&move_to(40.0, 40.0, Modifiers::CONTROL));
        assert_eq!(camera.position(), start);
    }

    #[test]
    fn test_modes_are_exclusive_and_release_clears() {
        let mut camera = CameraController::default();
        let events = [
            press(PointerButton::Primary, 0.0, 0.0),
            press(PointerButton::Secondary, 1.0, 1.0),
            move_to(5.0, 5.0, Modifiers::empty()),
            press(PointerButton::Middle, 2.0, 2.0),
            release(PointerButton::Primary, 3.0, 3.0),
            press(PointerButton::Secondary, 0.0, 0.0),
            press(PointerButton::Primary, 0.0, 0.0),
            release(PointerButton::Middle, 0.0, 0.0),
        ];

        for event in &events {
            camera.handle(event);
            assert!(!(camera.is_rotating() && camera.is_translating()));
            if let PointerEvent::Button { pressed: false, .. } = event {
                assert!(!camera.is_rotating());
                assert!(!camera.is_translating());
            }
        }
        assert_eq!(camera.mode(), CameraMode::Idle);
    }

    #[test]
    fn test_scroll_scales_without_clamp() {
        let mut camera = CameraController::default();
        for _ in 0..300 {
            camera.handle(&PointerEvent::Scroll {
                position: Vec2::ZERO,
                delta: Vec2::new(0.0, -1.0),
            });
        }
        assert!((camera.scale() - (1.0 - 3.0)).abs() < 1e-3);
    }

    #[test]
    fn test_drag_and_enter_are_ignored() {
        let mut camera = CameraController::default();
        let before = (camera.orientation(), camera.position(), camera.scale());
        assert!(camera.handle(&PointerEvent::Enter {
            position: Vec2::ZERO,
            entered: true,
        }));
        assert!(camera.handle(&PointerEvent::Drag {
            position: Vec2::new(9.0, 9.0),
            delta: Vec2::new(9.0, 9.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::empty(),
        }));
        assert_eq!(before, (camera.orientation(), camera.position(), camera.scale()));
        assert_eq!(camera.mode(), CameraMode::Idle);
    }

    #[test]
    fn test_swapped_buttons_from_config() {
        let mut camera = CameraController::new(CameraConfig {
            rotate_button: PointerButton::Secondary,
            translate_button: PointerButton::Primary,
            ..CameraConfig::default()
        });
        camera.handle(&press(PointerButton::Primary, 0.0, 0.0));
        assert_eq!(camera.mode(), CameraMode::Translating);
    }

    #[test]
    fn test_projection_terms() {
        let camera = CameraController::default();
        let proj = camera.projection_matrix(800.0, 600.0, 0.1, 100.0);
        let rows = proj.transpose().to_cols_array_2d();

        assert!((rows[0][0] - 1.5).abs() < EPS);
        assert!((rows[1][1] - (-2.0)).abs() < EPS);
        assert!((rows[2][2] - 100.1 / 99.9).abs() < EPS);
        assert!((rows[2][3] - (2.0 * 100.0 * 0.1 / (0.1 - 100.0))).abs() < EPS);
        assert_eq!(rows[3], [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_view_matrix_swaps_y_and_z() {
        let camera = CameraController::default();
        let view = camera.view_matrix();
        assert_eq!(view.transform_vector3(Vec3::Z), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(view.transform_vector3(Vec3::Y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(view.transform_vector3(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_world_matrix_inverts_placement() {
        let camera = CameraController::default();
        let world = camera.world_matrix();

        // The camera origin maps to the view origin
        assert!(world.transform_point3(camera.position()).length() < 1e-4);

        // world is the inverse of [R | p]
        let placement =
            Mat4::from_translation(camera.position()) * Mat4::from_mat3(camera.rotation());
        let identity = world * placement;
        assert!(identity.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn test_rotation_order() {
        let camera = CameraController::new(CameraConfig {
            orientation: [30.0, 60.0, -20.0],
            ..CameraConfig::default()
        });
        let expected = Mat3::from_rotation_z(60f32.to_radians())
            * Mat3::from_rotation_x((-20f32).to_radians())
            * Mat3::from_rotation_y(30f32.to_radians());
        assert!(camera.rotation().abs_diff_eq(expected, EPS));

        let reordered = Mat3::from_rotation_y(30f32.to_radians())
            * Mat3::from_rotation_x((-20f32).to_radians())
            * Mat3::from_rotation_z(60f32.to_radians());
        assert!(!camera.rotation().abs_diff_eq(reordered, EPS));
    }
}
