//! Trail rendering for the ball's motion history.
//!
//! The history itself lives on the CPU in [`Trail`]; each frame the points
//! are copied into a storage buffer and drawn as fading billboards.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::DEPTH_FORMAT;
use crate::gpu::shaders::TRAIL_SHADER;
use crate::trail::Trail;

/// Screen-space radius of a trail point, in clip units.
const POINT_SIZE: f32 = 0.004;

const POINT_BYTES: u64 = std::mem::size_of::<[f32; 4]>() as u64;

/// Parameters for trail rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct TrailParams {
    color: [f32; 4],
    num_points: u32,
    point_size: f32,
    _pad: [u32; 2],
}

/// GPU resources for trail rendering.
pub struct TrailState {
    /// Storage buffer of `vec4<f32>` points, oldest first.
    buffer: wgpu::Buffer,
    params_buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    /// Maximum points the buffer holds.
    capacity: u32,
    /// Points uploaded by the last [`update`](Self::update).
    num_points: u32,
    /// Reused staging vector for uploads.
    scratch: Vec<[f32; 4]>,
}

impl TrailState {
    /// Create a trail renderer able to hold `capacity` points, or as many as
    /// the device allows in one storage binding if that is fewer.
    pub fn new(
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        capacity: usize,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let limits = device.limits();
        let requested = capacity;
        let capacity = buffer_capacity(
            requested,
            u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size),
        );
        if (capacity as usize) < requested {
            tracing::warn!(
                requested,
                drawn = capacity,
                "trail longer than the GPU can bind; drawing the newest points only"
            );
        }
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Trail Buffer"),
            size: u64::from(capacity) * POINT_BYTES,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params = TrailParams {
            color: [1.0; 4],
            num_points: 0,
            point_size: POINT_SIZE,
            _pad: [0; 2],
        };
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Trail Params Buffer"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (pipeline, bind_group) = create_render_pipeline(
            device,
            uniform_buffer,
            &buffer,
            &params_buffer,
            surface_format,
        );

        Self {
            buffer,
            params_buffer,
            pipeline,
            bind_group,
            capacity,
            num_points: 0,
            scratch: Vec::with_capacity(capacity as usize),
        }
    }

    /// Upload the newest points of `trail` (up to capacity) and its colour.
    pub fn update(&mut self, queue: &wgpu::Queue, trail: &Trail) {
        let skip = trail.len().saturating_sub(self.capacity as usize);
        self.scratch.clear();
        self.scratch
            .extend(trail.iter().skip(skip).map(|p| p.extend(1.0).to_array()));
        self.num_points = self.scratch.len() as u32;

        if !self.scratch.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&self.scratch));
        }

        let params = TrailParams {
            color: trail.color.extend(0.8).to_array(),
            num_points: self.num_points,
            point_size: POINT_SIZE,
            _pad: [0; 2],
        };
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));
    }

    /// Record the draw into an open render pass.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.num_points == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..6, 0..self.num_points);
    }
}

fn create_render_pipeline(
    device: &wgpu::Device,
    uniform_buffer: &wgpu::Buffer,
    trail_buffer: &wgpu::Buffer,
    params_buffer: &wgpu::Buffer,
    surface_format: wgpu::TextureFormat,
) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Trail Render Shader"),
        source: wgpu::ShaderSource::Wgsl(TRAIL_SHADER.into()),
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Trail Render Bind Group Layout"),
        entries: &[
            buffer_entry(0, wgpu::BufferBindingType::Uniform),
            buffer_entry(1, wgpu::BufferBindingType::Storage { read_only: true }),
            buffer_entry(2, wgpu::BufferBindingType::Uniform),
        ],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Trail Render Bind Group"),
        layout: &bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: trail_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: params_buffer.as_entire_binding(),
            },
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Trail Render Pipeline Layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Trail Render Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
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
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    (pipeline, bind_group)
}

fn buffer_entry(binding: u32, ty: wgpu::BufferBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Points to allocate for a trail of `requested` points when a single
/// binding may span at most `max_binding_bytes`. Never zero, since storage
/// buffers may not be empty.
fn buffer_capacity(requested: usize, max_binding_bytes: u64) -> u32 {
    let fit = (max_binding_bytes / POINT_BYTES).min(u64::from(u32::MAX));
    (requested as u64).clamp(1, fit.max(1)) as u32
}
