//! Scene configuration.
//!
//! [`SceneConfig`] holds every tunable of the scene: box and ball dimensions,
//! the integration step, the tick rate and the colours used for drawing. It
//! can be built in code with `with_*` methods or loaded from JSON, where any
//! omitted field keeps its default.
//!
//! ```
//! use bouncebox::{SceneConfig, Vec3};
//!
//! let config = SceneConfig::default()
//!     .with_box_size(8.0)
//!     .with_initial_velocity(Vec3::new(10.0, 0.0, 4.0))
//!     .with_duration(None);
//! assert!(config.validate().is_ok());
//! ```

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Edge length of the box.
pub const BOX_SIZE: f32 = 12.0;
/// Half the edge length of the box.
pub const HALF_BOX: f32 = BOX_SIZE / 2.0;
/// Drawn thickness of each wall.
pub const WALL_THICKNESS: f32 = 0.2;
/// Radius of the ball.
pub const BALL_RADIUS: f32 = 0.5;
/// Simulated seconds per tick.
pub const TIME_STEP: f32 = 0.005;
/// Simulated seconds before the run finishes.
pub const SIM_DURATION: f32 = 3.0;
/// Maximum ticks per wall-clock second.
pub const TICK_RATE: u32 = 200;
/// Length of the velocity arrow per unit of speed.
pub const VELOCITY_SCALE: f32 = 0.1;
/// Most trail points a scene may keep. At 16 bytes each this stays well
/// inside the storage buffer size every wgpu backend guarantees.
pub const MAX_TRAIL_LENGTH: usize = 1 << 20;

pub const CYAN: Vec3 = Vec3::new(0.0, 1.0, 1.0);
pub const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const YELLOW: Vec3 = Vec3::new(1.0, 1.0, 0.0);

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Full edge length of the cubic box.
    pub box_size: f32,
    pub wall_thickness: f32,
    pub ball_radius: f32,
    pub initial_position: Vec3,
    pub initial_velocity: Vec3,
    /// Simulated seconds advanced per tick.
    pub time_step: f32,
    /// Simulated seconds to run for. `None` runs until the window closes.
    pub duration: Option<f32>,
    /// Upper bound on ticks per wall-clock second.
    pub tick_rate: u32,
    /// Arrow length per unit of speed.
    pub velocity_scale: f32,
    /// Maximum number of trail points kept.
    pub trail_length: usize,
    /// Minimum distance between recorded trail points. Zero records every tick.
    pub trail_spacing: f32,
    /// Draw the wall facing the camera. It collides either way.
    pub show_front_wall: bool,
    pub ball_color: Vec3,
    pub wall_color: Vec3,
    pub arrow_color: Vec3,
    pub background: Vec3,
    pub window_title: String,
    pub window_size: (u32, u32),
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            box_size: BOX_SIZE,
            wall_thickness: WALL_THICKNESS,
            ball_radius: BALL_RADIUS,
            initial_position: Vec3::new(-5.0, 0.0, 0.0),
            initial_velocity: Vec3::new(25.0, 5.0, 15.0),
            time_step: TIME_STEP,
            duration: Some(SIM_DURATION),
            tick_rate: TICK_RATE,
            velocity_scale: VELOCITY_SCALE,
            trail_length: 2000,
            trail_spacing: 0.0,
            show_front_wall: false,
            ball_color: CYAN,
            wall_color: GREEN,
            arrow_color: YELLOW,
            background: Vec3::new(0.0, 0.0, 0.0),
            window_title: "bouncebox".into(),
            window_size: (1280, 720),
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_box_size(mut self, size: f32) -> Self {
        self.box_size = size;
        self
    }

    pub fn with_wall_thickness(mut self, thickness: f32) -> Self {
        self.wall_thickness = thickness;
        self
    }

    pub fn with_ball_radius(mut self, radius: f32) -> Self {
        self.ball_radius = radius;
        self
    }

    pub fn with_initial_position(mut self, position: Vec3) -> Self {
        self.initial_position = position;
        self
    }

    pub fn with_initial_velocity(mut self, velocity: Vec3) -> Self {
        self.initial_velocity = velocity;
        self
    }

    pub fn with_time_step(mut self, dt: f32) -> Self {
        self.time_step = dt;
        self
    }

    /// Set how long to run in simulated seconds; `None` runs forever.
    pub fn with_duration(mut self, duration: Option<f32>) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_tick_rate(mut self, rate: u32) -> Self {
        self.tick_rate = rate;
        self
    }

    pub fn with_velocity_scale(mut self, scale: f32) -> Self {
        self.velocity_scale = scale;
        self
    }

    /// Keep at most `length` trail points, at least `spacing` apart.
    pub fn with_trail(mut self, length: usize, spacing: f32) -> Self {
        self.trail_length = length;
        self.trail_spacing = spacing;
        self
    }

    pub fn with_front_wall(mut self, show: bool) -> Self {
        self.show_front_wall = show;
        self
    }

    pub fn with_ball_color(mut self, color: Vec3) -> Self {
        self.ball_color = color;
        self
    }

    pub fn with_wall_color(mut self, color: Vec3) -> Self {
        self.wall_color = color;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn half_box(&self) -> f32 {
        self.box_size * 0.5
    }

    /// Check that the scene can be simulated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("box_size", self.box_size)?;
        positive("ball_radius", self.ball_radius)?;
        positive("time_step", self.time_step)?;
        positive("wall_thickness", self.wall_thickness)?;
        finite("velocity_scale", self.velocity_scale)?;
        finite("trail_spacing", self.trail_spacing)?;
        if let Some(duration) = self.duration {
            positive("duration", duration)?;
        }
        if self.trail_length > MAX_TRAIL_LENGTH {
            return Err(ConfigError::TooLarge {
                field: "trail_length",
                max: MAX_TRAIL_LENGTH,
            });
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::NonPositive("tick_rate"));
        }
        if !self.initial_position.is_finite() {
            return Err(ConfigError::NonFinite("initial_position"));
        }
        if !self.initial_velocity.is_finite() {
            return Err(ConfigError::NonFinite("initial_velocity"));
        }
        if 2.0 * self.ball_radius >= self.box_size {
            return Err(ConfigError::BallTooLarge {
                radius: self.ball_radius,
                box_size: self.box_size,
            });
        }
        let reach = self.initial_position.abs().max_element() + self.ball_radius;
        if reach > self.half_box() {
            return Err(ConfigError::StartOutsideBox);
        }
        Ok(())
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite(field))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.half_box(), HALF_BOX);
        assert_eq!(config.duration, Some(3.0));
    }

    #[test]
    fn test_rejects_zero_time_step() {
        let config = SceneConfig::default().with_time_step(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive("time_step"))
        ));
    }

    #[test]
    fn test_rejects_nan_radius() {
        let config = SceneConfig::default().with_ball_radius(f32::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite("ball_radius"))
        ));
    }

    #[test]
    fn test_rejects_oversized_ball() {
        let config = SceneConfig::default()
            .with_ball_radius(6.0)
            .with_initial_position(Vec3::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BallTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_start_in_wall() {
        let config = SceneConfig::default().with_initial_position(Vec3::new(0.0, 5.9, 0.0));
        assert!(matches!(config.validate(), Err(ConfigError::StartOutsideBox)));
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let config = SceneConfig::default().with_tick_rate(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive("tick_rate"))
        ));
    }

    #[test]
    fn test_rejects_negative_wall_thickness() {
        let config = SceneConfig::default().with_wall_thickness(-0.2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive("wall_thickness"))
        ));
    }

    #[test]
    fn test_trail_length_is_bounded() {
        let at_limit = SceneConfig::default().with_trail(MAX_TRAIL_LENGTH, 0.0);
        assert!(at_limit.validate().is_ok());

        let over = SceneConfig::default().with_trail(10_000_000, 0.0);
        assert!(matches!(
            over.validate(),
            Err(ConfigError::TooLarge { field: "trail_length", .. })
        ));
    }

    #[test]
    fn test_json_partial_keeps_defaults() {
        let config = SceneConfig::from_json_str(r#"{ "ball_radius": 0.25, "duration": null }"#).unwrap();
        assert_eq!(config.ball_radius, 0.25);
        assert_eq!(config.duration, None);
        assert_eq!(config.box_size, BOX_SIZE);
        assert_eq!(config.initial_velocity, Vec3::new(25.0, 5.0, 15.0));
    }

    #[test]
    fn test_json_vectors_are_arrays() {
        let config = SceneConfig::from_json_str(r#"{ "initial_velocity": [1.0, 2.0, 3.0] }"#).unwrap();
        assert_eq!(config.initial_velocity, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_json_invalid_scene_is_rejected() {
        let result = SceneConfig::from_json_str(r#"{ "box_size": -1.0 }"#);
        assert!(matches!(result, Err(ConfigError::NonPositive("box_size"))));
    }

    #[test]
    fn test_json_syntax_error() {
        let result = SceneConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SceneConfig::default().with_trail(50, 0.1).with_front_wall(true);
        let json = serde_json::to_string(&config).unwrap();
        let back = SceneConfig::from_json_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
