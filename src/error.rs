//! Error types.
//!
//! [`ConfigError`] covers scenes that cannot be simulated, [`GpuError`] the
//! ways wgpu setup can fail, and [`SimulationError`] wraps both for the
//! windowed and headless entry points.

use std::fmt;

/// wgpu setup failures.
#[derive(Debug)]
pub enum GpuError {
    /// The window could not back a wgpu surface.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter can present to the window's surface.
    NoAdapter,
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reported no usable formats or alpha modes.
    UnsupportedSurface,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "cannot create a render surface: {}", e),
            GpuError::NoAdapter => write!(f, "no GPU adapter can draw to this window (needs Vulkan, Metal, DX12 or WebGPU)"),
            GpuError::DeviceCreation(e) => write!(f, "cannot open the GPU device: {}", e),
            GpuError::UnsupportedSurface => write!(f, "the surface offers no usable format or alpha mode"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors in a scene configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A quantity that must be strictly positive was zero or negative.
    NonPositive(&'static str),
    /// A quantity was NaN or infinite.
    NonFinite(&'static str),
    /// A count exceeds what the renderer can hold.
    TooLarge { field: &'static str, max: usize },
    /// The ball is as wide as (or wider than) the box along some axis.
    BallTooLarge { radius: f32, box_size: f32 },
    /// The starting position already overlaps a wall.
    StartOutsideBox,
    /// Reading or writing the config file failed.
    Io(std::io::Error),
    /// The config file is not valid JSON for a scene.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive(field) => write!(f, "`{}` must be greater than zero", field),
            ConfigError::NonFinite(field) => write!(f, "`{}` must be a finite number", field),
            ConfigError::TooLarge { field, max } => write!(f, "`{}` must be at most {}", field, max),
            ConfigError::BallTooLarge { radius, box_size } => write!(
                f,
                "a ball of radius {} does not fit in a box of size {}",
                radius, box_size
            ),
            ConfigError::StartOutsideBox => write!(f, "the initial ball position overlaps a wall"),
            ConfigError::Io(e) => write!(f, "config file: {}", e),
            ConfigError::Parse(e) => write!(f, "malformed scene JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Anything that stops a run from starting or finishing.
#[derive(Debug)]
pub enum SimulationError {
    EventLoop(winit::error::EventLoopError),
    Window(winit::error::OsError),
    Gpu(GpuError),
    Config(ConfigError),
    /// A headless run was asked to go on forever.
    UnboundedDuration,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::EventLoop(e) => write!(f, "event loop failed: {}", e),
            SimulationError::Window(e) => write!(f, "cannot open a window: {}", e),
            SimulationError::Gpu(e) => write!(f, "{}", e),
            SimulationError::Config(e) => write!(f, "invalid scene: {}", e),
            SimulationError::UnboundedDuration => write!(f, "a headless run needs a finite `duration`"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::EventLoop(e) => Some(e),
            SimulationError::Window(e) => Some(e),
            SimulationError::Gpu(e) => Some(e),
            SimulationError::Config(e) => Some(e),
            SimulationError::UnboundedDuration => None,
        }
    }
}

impl From<winit::error::EventLoopError> for SimulationError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SimulationError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SimulationError {
    fn from(e: winit::error::OsError) -> Self {
        SimulationError::Window(e)
    }
}

impl From<GpuError> for SimulationError {
    fn from(e: GpuError) -> Self {
        SimulationError::Gpu(e)
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}
