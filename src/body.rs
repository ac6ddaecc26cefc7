//! The moving sphere.

use glam::Vec3;

/// A sphere with a position and a constant-speed velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
}

impl Ball {
    pub fn new(position: Vec3, velocity: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Advance the position by one explicit Euler step.
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate() {
        let mut ball = Ball::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(25.0, 5.0, 15.0), 0.5);
        ball.integrate(0.005);

        let expected = Vec3::new(-4.875, 0.025, 0.075);
        assert!((ball.position - expected).length() < 1e-6);
        assert_eq!(ball.velocity, Vec3::new(25.0, 5.0, 15.0));
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut ball = Ball::new(Vec3::ONE, Vec3::splat(3.0), 0.5);
        ball.integrate(0.0);
        assert_eq!(ball.position, Vec3::ONE);
    }

    #[test]
    fn test_speed() {
        let ball = Ball::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0), 1.0);
        assert_eq!(ball.speed(), 5.0);
    }
}
