//! Simulation state and stepping.
//!
//! A [`Simulation`] owns the ball, the box, the velocity arrow and the trail.
//! Every tick it reflects the ball off any wall it penetrates, integrates the
//! position, then refreshes the arrow and the trail.

use glam::Vec3;

use crate::body::Ball;
use crate::bounds::{Cuboid, Reflections};
use crate::config::SceneConfig;
use crate::error::{ConfigError, SimulationError};
use crate::trail::Trail;

/// Arrow drawn from the ball's centre along its velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityArrow {
    pub origin: Vec3,
    pub axis: Vec3,
    /// Arrow length per unit of speed.
    pub scale: f32,
}

impl VelocityArrow {
    pub fn new(scale: f32) -> Self {
        Self {
            origin: Vec3::ZERO,
            axis: Vec3::ZERO,
            scale,
        }
    }

    /// Re-anchor the arrow on the ball.
    pub fn update(&mut self, ball: &Ball) {
        self.origin = ball.position;
        self.axis = ball.velocity * self.scale;
    }

    /// Position of the arrow tip.
    pub fn tip(&self) -> Vec3 {
        self.origin + self.axis
    }
}

/// What happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Index of the tick, starting at 1.
    pub tick: u64,
    /// Simulated time at the end of the tick.
    pub elapsed: f64,
    pub reflections: Reflections,
}

/// Final numbers from a completed run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: f64,
    pub bounces: u64,
    pub final_position: Vec3,
    pub final_velocity: Vec3,
}

/// The bouncing-ball world.
#[derive(Clone, Debug)]
pub struct Simulation {
    ball: Ball,
    initial: Ball,
    bounds: Cuboid,
    arrow: VelocityArrow,
    trail: Trail,
    time_step: f32,
    duration: Option<f32>,
    /// Kept in f64: an f32 sum stops advancing once `dt` falls below half
    /// an ulp of the total.
    elapsed: f64,
    ticks: u64,
    bounces: u64,
}

impl Simulation {
    /// Build the world described by `config`.
    pub fn new(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let ball = Ball::new(
            config.initial_position,
            config.initial_velocity,
            config.ball_radius,
        );
        let mut arrow = VelocityArrow::new(config.velocity_scale);
        arrow.update(&ball);

        Ok(Self {
            ball,
            initial: ball,
            bounds: Cuboid::cube(config.box_size),
            arrow,
            trail: Trail::new(config.trail_length, config.trail_spacing, config.ball_color),
            time_step: config.time_step,
            duration: config.duration,
            elapsed: 0.0,
            ticks: 0,
            bounces: 0,
        })
    }

    /// Advance by `dt` simulated seconds.
    ///
    /// Collisions are resolved before integrating, so a ball that ends a tick
    /// inside a wall's band is turned around at the start of the next one.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let reflections = self.bounds.reflect(&mut self.ball);
        self.ball.integrate(dt);
        self.arrow.update(&self.ball);
        self.trail.record(self.ball.position);

        self.elapsed += f64::from(dt);
        self.ticks += 1;
        self.bounces += reflections.count() as u64;

        StepReport {
            tick: self.ticks,
            elapsed: self.elapsed,
            reflections,
        }
    }

    /// Run one tick of the configured length, unless the run has finished.
    pub fn tick(&mut self) -> Option<StepReport> {
        if self.is_finished() {
            return None;
        }
        Some(self.step(self.time_step))
    }

    /// Whether the configured duration has been simulated.
    pub fn is_finished(&self) -> bool {
        // slack absorbs rounding in an f32 step, so 3 s of 5 ms ticks is 600
        let slack = f64::from(self.time_step) * 1e-4;
        self.duration
            .is_some_and(|d| self.elapsed + slack >= f64::from(d))
    }

    /// Tick until finished, calling `on_step` after every tick.
    ///
    /// Runs as fast as possible; pacing is the caller's concern.
    pub fn run_headless<F>(&mut self, mut on_step: F) -> Result<RunSummary, SimulationError>
    where
        F: FnMut(&Simulation, &StepReport),
    {
        if self.duration.is_none() {
            return Err(SimulationError::UnboundedDuration);
        }
        while let Some(report) = self.tick() {
            on_step(self, &report);
        }
        Ok(self.summary())
    }

    /// Put the ball back where it started and clear the history.
    pub fn reset(&mut self) {
        self.ball = self.initial;
        self.arrow.update(&self.ball);
        self.trail.clear();
        self.elapsed = 0.0;
        self.ticks = 0;
        self.bounces = 0;
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            elapsed: self.elapsed,
            bounces: self.bounces,
            final_position: self.ball.position,
            final_velocity: self.ball.velocity,
        }
    }

    #[inline]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    #[inline]
    pub fn bounds(&self) -> &Cuboid {
        &self.bounds
    }

    #[inline]
    pub fn arrow(&self) -> &VelocityArrow {
        &self.arrow
    }

    #[inline]
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Simulated seconds since start or last reset.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    /// Wall reflections since start or last reset.
    #[inline]
    pub fn bounce_count(&self) -> u64 {
        self.bounces
    }
}
