//! GPU rendering of the scene.
//!
//! Solids (walls, ball, velocity arrow) share one lit, instanced pipeline;
//! the trail has its own billboard pipeline. Everything is redrawn from the
//! [`Simulation`] state every frame.

mod camera;
pub mod mesh;
pub(crate) mod shaders;
mod trails;

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3, Vec4};
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use camera::Camera;
use mesh::{ArrowShape, Mesh, Vertex};
use trails::TrailState;

use crate::bounds::Wall;
use crate::config::SceneConfig;
use crate::error::GpuError;
use crate::simulation::Simulation;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Six walls, the ball and the arrow.
const MAX_INSTANCES: usize = 8;

const LIGHT_DIR: Vec3 = Vec3::new(-0.4, -1.0, -0.6);

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_dir: [f32; 4],
    time: f32,
    _padding: [f32; 3],
}

/// Per-instance data for the mesh pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl Instance {
    pub fn new(model: Mat4, color: Vec4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_array(),
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Model matrix that maps the unit arrow mesh onto `origin -> origin + axis`.
///
/// Returns `None` for a zero-length axis, which has no direction to draw.
pub fn arrow_transform(origin: Vec3, axis: Vec3) -> Option<Mat4> {
    let length = axis.length();
    if length <= f32::EPSILON || !length.is_finite() {
        return None;
    }
    let rotation = Quat::from_rotation_arc(Vec3::Z, axis / length);
    Some(Mat4::from_scale_rotation_translation(
        Vec3::splat(length),
        rotation,
        origin,
    ))
}

/// Instances to draw for one frame, grouped by mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneInstances {
    pub walls: Vec<Instance>,
    pub ball: Option<Instance>,
    pub arrow: Option<Instance>,
}

impl SceneInstances {
    /// Collect the instances for the current simulation state.
    pub fn build(sim: &Simulation, config: &SceneConfig) -> Self {
        let walls = sim
            .bounds()
            .wall_slabs(config.wall_thickness)
            .filter(|slab| config.show_front_wall || slab.wall != Wall::FRONT)
            .map(|slab| {
                Instance::new(
                    Mat4::from_scale_rotation_translation(slab.size, Quat::IDENTITY, slab.center),
                    config.wall_color.extend(1.0),
                )
            })
            .collect();

        let ball = sim.ball();
        let ball = Instance::new(
            Mat4::from_scale_rotation_translation(
                Vec3::splat(ball.radius),
                Quat::IDENTITY,
                ball.position,
            ),
            config.ball_color.extend(1.0),
        );

        let arrow = sim.arrow();
        let arrow = arrow_transform(arrow.origin, arrow.axis)
            .map(|model| Instance::new(model, config.arrow_color.extend(1.0)));

        Self {
            walls,
            ball: Some(ball),
            arrow,
        }
    }

    /// Flatten into one buffer: walls, then the ball, then the arrow.
    ///
    /// Returns the instance data and the ranges for each mesh.
    fn flatten(&self) -> (Vec<Instance>, [Range<u32>; 3]) {
        let mut all = self.walls.clone();
        let walls = 0..all.len() as u32;
        all.extend(self.ball);
        let ball = walls.end..all.len() as u32;
        all.extend(self.arrow);
        let arrow = ball.end..all.len() as u32;
        (all, [walls, ball, arrow])
    }
}

/// A mesh uploaded to the GPU.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        if instances.is_empty() {
            return;
        }
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, instances);
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    mesh_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    cube: GpuMesh,
    sphere: GpuMesh,
    arrow: GpuMesh,
    trail: TrailState,
    depth_texture: wgpu::TextureView,
    clear_color: wgpu::Color,
    pub camera: Camera,
    start_time: Instant,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, scene: &SceneConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        tracing::info!(adapter = ?adapter.get_info().name, backend = ?adapter.get_info().backend, "selected GPU adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let camera = Camera::framing(scene.box_size);
        let uniforms = Uniforms {
            view_proj: camera.view_proj(aspect(&config)).to_cols_array_2d(),
            camera_pos: camera.position().extend(1.0).to_array(),
            light_dir: LIGHT_DIR.normalize().extend(0.0).to_array(),
            time: 0.0,
            _padding: [0.0; 3],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (MAX_INSTANCES * std::mem::size_of::<Instance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let mesh_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Mesh Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&mesh_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout(), Instance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let cube = GpuMesh::upload(&device, &mesh::unit_cube(), "Cube");
        let sphere = GpuMesh::upload(&device, &mesh::uv_sphere(24, 32), "Sphere");
        let arrow = GpuMesh::upload(&device, &mesh::arrow(ArrowShape::default(), 16), "Arrow");

        let trail = TrailState::new(&device, &uniform_buffer, scene.trail_length, config.format);

        let bg = scene.background;
        let clear_color = wgpu::Color {
            r: bg.x as f64,
            g: bg.y as f64,
            b: bg.z as f64,
            a: 1.0,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            mesh_pipeline,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            cube,
            sphere,
            arrow,
            trail,
            depth_texture,
            clear_color,
            camera,
            start_time: Instant::now(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.resize(winit::dpi::PhysicalSize {
            width: self.config.width,
            height: self.config.height,
        });
    }

    fn update_uniforms(&mut self) {
        let uniforms = Uniforms {
            view_proj: self.camera.view_proj(aspect(&self.config)).to_cols_array_2d(),
            camera_pos: self.camera.position().extend(1.0).to_array(),
            light_dir: LIGHT_DIR.normalize().extend(0.0).to_array(),
            time: self.start_time.elapsed().as_secs_f32(),
            _padding: [0.0; 3],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn render(&mut self, sim: &Simulation, scene: &SceneConfig) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms();

        let (instances, [walls, ball, arrow]) = SceneInstances::build(sim, scene).flatten();
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        self.trail.update(&self.queue, sim.trail());

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.mesh_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            self.cube.draw(&mut render_pass, walls);
            self.sphere.draw(&mut render_pass, ball);
            self.arrow.draw(&mut render_pass, arrow);

            // translucent, drawn after the solids
            self.trail.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn aspect(config: &wgpu::SurfaceConfiguration) -> f32 {
    config.width as f32 / config.height.max(1) as f32
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
