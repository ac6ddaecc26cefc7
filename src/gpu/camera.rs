//! Camera for 3D orbit view.

use glam::{Mat4, Vec2, Vec3};

const FOV_Y_DEGREES: f32 = 45.0;
const ORBIT_SPEED: f32 = 0.005;
const PITCH_LIMIT: f32 = 1.5;

/// Orbit camera looking at the box.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    min_distance: f32,
    max_distance: f32,
}

impl Camera {
    /// Camera that frames a box of edge `box_size` centred on the origin.
    pub fn framing(box_size: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: box_size * 2.0,
            target: Vec3::ZERO,
            min_distance: box_size * 0.25,
            max_distance: box_size * 6.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        let far = (self.max_distance * 4.0).max(100.0);
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, 0.1, far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }

    /// Rotate by a mouse drag of `delta` pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SPEED;
        self.pitch = (self.pitch + delta.y * ORBIT_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move closer for positive `scroll`, further for negative.
    pub fn zoom(&mut self, scroll: f32) {
        let step = self.max_distance * 0.02;
        self.distance = (self.distance - scroll * step).clamp(self.min_distance, self.max_distance);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::framing(crate::config::BOX_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sees_whole_box() {
        let camera = Camera::default();
        let half = crate::config::HALF_BOX;
        let view_proj = camera.view_proj(16.0 / 9.0);

        for corner in [
            Vec3::new(-half, -half, -half),
            Vec3::new(half, half, half),
            Vec3::new(-half, half, half),
            Vec3::new(half, -half, -half),
        ] {
            let clip = view_proj * corner.extend(1.0);
            let ndc = clip.truncate() / clip.w;
            assert!(clip.w > 0.0);
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "corner {:?} off screen", corner);
        }
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut camera = Camera::default();
        camera.orbit(Vec2::new(0.0, 10_000.0));
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.orbit(Vec2::new(0.0, -100_000.0));
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = Camera::framing(10.0);
        camera.zoom(1_000.0);
        assert_eq!(camera.distance, 2.5);
        camera.zoom(-1_000.0);
        assert_eq!(camera.distance, 60.0);
    }

    #[test]
    fn test_position_distance() {
        let camera = Camera::framing(12.0);
        assert!((camera.position().length() - 24.0).abs() < 1e-4);
    }
}
