//! # bouncebox
//!
//! A single sphere bouncing inside a closed box, drawn with wgpu.
//!
//! The world is one moving [`Ball`] and the six walls of a [`Cuboid`]. Each
//! tick the ball is reflected off any wall its bounding sphere pokes through,
//! then moved by one explicit Euler step. A velocity arrow and a fading trail
//! follow it around.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bouncebox::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let config = SceneConfig::default()
//!         .with_initial_velocity(Vec3::new(25.0, 5.0, 15.0))
//!         .with_duration(None);
//!     bouncebox::run(config)
//! }
//! ```
//!
//! ## Headless
//!
//! The simulation does not need a window:
//!
//! ```
//! use bouncebox::prelude::*;
//!
//! let mut sim = Simulation::new(&SceneConfig::default()).unwrap();
//! let summary = sim.run_headless(|_, _| {}).unwrap();
//! assert_eq!(summary.ticks, sim.ticks());
//! assert!(summary.bounces > 0);
//! ```
//!
//! ## Collision rule
//!
//! Along each axis the ball penetrates a wall when `|p| + r > half_extent`.
//! The velocity component on that axis is negated, but only while it still
//! points out of the box, so each crossing flips it exactly once.

mod body;
mod bounds;
pub mod config;
mod error;
pub mod gpu;
pub mod input;
mod simulation;
pub mod time;
mod trail;
mod window;

pub use body::Ball;
pub use bounds::{Axis, Cuboid, Reflections, Side, Wall, WallSlab};
pub use config::SceneConfig;
pub use error::{ConfigError, GpuError, SimulationError};
pub use glam::{Vec2, Vec3, Vec4};
pub use simulation::{RunSummary, Simulation, StepReport, VelocityArrow};
pub use trail::Trail;
pub use window::run;

/// Convenient re-exports for common usage.
///
/// ```
/// use bouncebox::prelude::*;
/// ```
pub mod prelude {
    pub use crate::body::Ball;
    pub use crate::bounds::{Axis, Cuboid, Reflections, Side, Wall};
    pub use crate::config::SceneConfig;
    pub use crate::error::{ConfigError, SimulationError};
    pub use crate::simulation::{RunSummary, Simulation, StepReport, VelocityArrow};
    pub use crate::time::{RateLimiter, Time};
    pub use crate::trail::Trail;
    pub use crate::{Vec2, Vec3, Vec4};
}
