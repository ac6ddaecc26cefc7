//! Windowed viewer.
//!
//! Opens a window, runs the simulation at a fixed tick rate, and draws it
//! every frame. Controls:
//!
//! | Input | Action |
//! |---|---|
//! | left drag | orbit the camera |
//! | wheel | zoom |
//! | `Space` | pause / resume |
//! | `R` | restart from the initial state |
//! | `F` | show / hide the front wall |
//! | `Up` / `Down` | double / halve playback speed |
//! | `Escape` | quit |

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::SimulationError;
use crate::gpu::GpuState;
use crate::input::{Input, KeyCode, MouseButton};
use crate::simulation::Simulation;
use crate::time::{RateLimiter, Time};

const MIN_TIME_SCALE: f32 = 0.125;
const MAX_TIME_SCALE: f32 = 8.0;

/// Open a window and run the scene until it is closed.
pub fn run(config: SceneConfig) -> Result<(), SimulationError> {
    let sim = Simulation::new(&config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, sim);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    config: SceneConfig,
    sim: Simulation,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    input: Input,
    time: Time,
    limiter: RateLimiter,
    /// First fatal error, reported once the event loop returns.
    error: Option<SimulationError>,
    finished_reported: bool,
}

impl App {
    fn new(config: SceneConfig, sim: Simulation) -> Self {
        let limiter = RateLimiter::new(config.tick_rate);
        Self {
            config,
            sim,
            window: None,
            gpu_state: None,
            input: Input::new(),
            time: Time::new(),
            limiter,
            error: None,
            finished_reported: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SimulationError) {
        tracing::error!("{}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn handle_keys(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
        }
        if self.input.key_pressed(KeyCode::Space) {
            self.time.toggle_pause();
            tracing::info!(paused = self.time.is_paused(), "toggled pause");
        }
        if self.input.key_pressed(KeyCode::R) {
            self.sim.reset();
            self.limiter.reset();
            self.finished_reported = false;
            tracing::info!("simulation reset");
        }
        if self.input.key_pressed(KeyCode::F) {
            self.config.show_front_wall = !self.config.show_front_wall;
        }
        if self.input.key_pressed(KeyCode::Up) {
            let scale = (self.time.time_scale() * 2.0).min(MAX_TIME_SCALE);
            self.time.set_time_scale(scale);
            tracing::info!(scale, "playback speed");
        }
        if self.input.key_pressed(KeyCode::Down) {
            let scale = (self.time.time_scale() * 0.5).max(MIN_TIME_SCALE);
            self.time.set_time_scale(scale);
            tracing::info!(scale, "playback speed");
        }
    }

    /// Run however many ticks the clock says are due.
    fn advance(&mut self) {
        let due = self
            .limiter
            .ticks_due_at(self.time.delta_duration(), self.time.time_scale());
        for _ in 0..due {
            let Some(report) = self.sim.tick() else {
                break;
            };
            for wall in report.reflections.iter() {
                tracing::debug!(
                    tick = report.tick,
                    t = report.elapsed,
                    wall = wall.name(),
                    "bounce"
                );
            }
        }

        if self.sim.is_finished() && !self.finished_reported {
            self.finished_reported = true;
            let summary = self.sim.summary();
            tracing::info!(
                ticks = summary.ticks,
                elapsed = summary.elapsed,
                bounces = summary.bounces,
                "simulation finished; press R to restart"
            );
        }
    }

    fn update_camera(&mut self) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        if self.input.mouse_held(MouseButton::Left) {
            gpu_state.camera.orbit(self.input.mouse_delta());
        }
        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            gpu_state.camera.zoom(scroll);
        }
    }

    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.time.frame() % 30 != 0 {
            return;
        }
        window.set_title(&format!(
            "{} | t = {:.2}s | bounces: {} | {:.0} FPS",
            self.config.window_title,
            self.sim.elapsed(),
            self.sim.bounce_count(),
            self.time.fps()
        ));
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.time.update();
        self.handle_keys(event_loop);
        self.advance();
        self.update_camera();
        self.update_title();

        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render(&self.sim, &self.config) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu_state.reconfigure()
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    tracing::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => tracing::warn!("Render error: {:?}", e),
            }
        }

        self.input.begin_frame();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window, &self.config)) {
            Ok(gpu_state) => {
                self.gpu_state = Some(gpu_state);
                // don't count window creation against the first frame
                self.time.reset();
                tracing::info!(
                    tick_rate = self.config.tick_rate,
                    dt = self.config.time_step,
                    "simulation started"
                );
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
