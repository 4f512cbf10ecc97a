//! GPU renderer backed by wgpu that draws the demo scene.
//!
//! The renderer owns the window, the surface and two fixed pipelines: a
//! passthrough pipeline for a vertex-coloured tetrahedron and a checker
//! pipeline for the floor plane.  Geometry is uploaded once at start-up;
//! the only per-frame traffic is the uniform write and the draw calls.

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use log::info;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::math::Mat4;

/// Per-frame uniform payload shared by both pipelines.
///
/// Field order and padding match the WGSL `Uniforms` struct; the matrix is
/// the camera's column-major 16-float layout copied as-is.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct FrameUniforms {
    pub model_view_projection: [f32; 16],
    pub frame: u32,
    pub frame_radians: f32,
    _padding: [u32; 2],
}

impl FrameUniforms {
    pub fn new(model_view_projection: &Mat4, frame: u32, frame_radians: f32) -> Self {
        Self {
            model_view_projection: model_view_projection.to_array(),
            frame,
            frame_radians,
            _padding: [0; 2],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    colour: [f32; 3],
}

/// GPU renderer for the spinning demo scene.
pub struct Renderer {
    // Field order matters: the surface borrows the window's raw handles
    // and must drop before it.
    surface: wgpu::Surface,
    window: Window,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: DepthBuffer,
    passthrough_pipeline: wgpu::RenderPipeline,
    checker_pipeline: wgpu::RenderPipeline,
    tetrahedron: MeshBuffers,
    floor: MeshBuffers,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window.
    pub async fn new(window: Window) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        // Safety: the window lives in Self alongside the surface and is
        // dropped after it.
        let surface = unsafe { instance.create_surface(&window) }
            .context("failed to create rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;
        info!("rendering with {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("renderer-device"),
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<FrameUniforms>() as u64)
                            .context("uniform struct has zero size")?,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("renderer-pipeline-layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let passthrough_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            surface_format,
            "passthrough",
            PASSTHROUGH_SHADER,
        );
        let checker_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            surface_format,
            "checker",
            CHECKER_SHADER,
        );

        let tetrahedron = MeshBuffers::new(
            &device,
            "tetrahedron",
            TETRAHEDRON_VERTICES,
            TETRAHEDRON_INDICES,
        );
        let floor = MeshBuffers::new(&device, "floor", FLOOR_VERTICES, FLOOR_INDICES);

        let uniforms = FrameUniforms::new(&Mat4::identity(), 0, 0.0);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame-uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform-bind-group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            surface,
            window,
            device,
            queue,
            config,
            depth,
            passthrough_pipeline,
            checker_pipeline,
            tetrahedron,
            floor,
            uniform_buffer,
            uniform_bind_group,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Exposes the inner window for event handling.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Uploads the per-frame uniforms before rendering.
    pub fn write_uniforms(&self, uniforms: &FrameUniforms) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Draws the floor and the tetrahedron into the current backbuffer.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("renderer-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.03,
                            g: 0.03,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            pass.set_pipeline(&self.checker_pipeline);
            pass.set_vertex_buffer(0, self.floor.vertex.slice(..));
            pass.set_index_buffer(self.floor.index.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.floor.index_count, 0, 0..1);

            pass.set_pipeline(&self.passthrough_pipeline);
            pass.set_vertex_buffer(0, self.tetrahedron.vertex.slice(..));
            pass.set_index_buffer(self.tetrahedron.index.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.tetrahedron.index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    label: &str,
    shader_source: &str,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: (3 * std::mem::size_of::<f32>()) as u64,
                        shader_location: 1,
                    },
                ],
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
    })
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u16]) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: indices.len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

const PASSTHROUGH_SHADER: &str = r#"
struct Uniforms {
    model_view_projection: mat4x4<f32>,
    frame: u32,
    frame_radians: f32,
}

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) colour: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) colour: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.position = uniforms.model_view_projection * vec4<f32>(input.position, 1.0);
    out.colour = input.colour;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.colour, 1.0);
}
"#;

const CHECKER_SHADER: &str = r#"
struct Uniforms {
    model_view_projection: mat4x4<f32>,
    frame: u32,
    frame_radians: f32,
}

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) colour: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.position = uniforms.model_view_projection * vec4<f32>(input.position, 1.0);
    out.world_pos = input.position;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let cell = i32(floor(input.world_pos.x)) + i32(floor(input.world_pos.z));
    if cell % 2 == 0 {
        return vec4<f32>(0.85, 0.85, 0.85, 1.0);
    }
    return vec4<f32>(0.25, 0.25, 0.3, 1.0);
}
"#;

const TETRAHEDRON_VERTICES: &[Vertex] = &[
    Vertex {
        position: [0.0, 0.5, 0.0],
        colour: [1.0, 0.0, 0.0],
    },
    Vertex {
        position: [0.5, -0.5, -0.5],
        colour: [0.0, 1.0, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, -0.5],
        colour: [0.0, 0.0, 1.0],
    },
    Vertex {
        position: [0.0, -0.5, 0.5],
        colour: [1.0, 1.0, 0.0],
    },
];

const TETRAHEDRON_INDICES: &[u16] = &[
    0, 1, 2, // face 1
    0, 3, 1, // face 2
    0, 2, 3, // face 3
    3, 2, 1, // face 4
];

const FLOOR_VERTICES: &[Vertex] = &[
    Vertex {
        position: [-6.0, -0.75, -6.0],
        colour: [1.0, 1.0, 1.0],
    },
    Vertex {
        position: [6.0, -0.75, -6.0],
        colour: [1.0, 1.0, 1.0],
    },
    Vertex {
        position: [6.0, -0.75, 6.0],
        colour: [1.0, 1.0, 1.0],
    },
    Vertex {
        position: [-6.0, -0.75, 6.0],
        colour: [1.0, 1.0, 1.0],
    },
];

const FLOOR_INDICES: &[u16] = &[
    0, 2, 1, //
    0, 3, 2,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_struct_matches_the_wgsl_layout() {
        // mat4x4 (64) + u32 + f32 (8), rounded up to a 16-byte boundary.
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 80);
    }

    #[test]
    fn uniforms_carry_the_matrix_in_storage_order() {
        let mvp = Mat4::translate(crate::math::Vec3::new(2.4, -3.4, 10.9));
        let uniforms = FrameUniforms::new(&mvp, 7, 0.5);
        assert_eq!(uniforms.model_view_projection, mvp.to_array());
        assert_eq!(uniforms.frame, 7);
    }

    #[test]
    fn mesh_indices_stay_in_bounds() {
        for index in TETRAHEDRON_INDICES {
            assert!((*index as usize) < TETRAHEDRON_VERTICES.len());
        }
        for index in FLOOR_INDICES {
            assert!((*index as usize) < FLOOR_VERTICES.len());
        }
    }

    #[test]
    fn vertex_stride_is_two_packed_vec3s() {
        assert_eq!(std::mem::size_of::<Vertex>(), 6 * std::mem::size_of::<f32>());
    }
}
