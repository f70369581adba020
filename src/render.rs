use std::borrow::Cow;

use wgpu::{util::DeviceExt, BindGroupLayoutEntry};

use crate::{links::Link, particle, particle::Particle, theme::Palette};

const CORNER_VERTICES: u32 = 6;

/// Uniforms shared by both pipelines. Layout mirrors `Globals` in render.wgsl.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    screen_size: [f32; 2],
    _pad: [f32; 2],
    dot_color: [f32; 4],
    line_color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct LineVertex {
    position: [f32; 2],
    alpha: f32,
}

/// Draws one frame of the effect: clear to the palette background, then the
/// connection lines, then every particle as a filled circle on an instanced
/// quad.
pub struct RenderModule {
    globals_buffer: wgpu::Buffer,
    corner_buffer: wgpu::Buffer,

    line_buffer: wgpu::Buffer,
    line_capacity: u64,
    num_line_vertices: u32,

    particle_buffer: wgpu::Buffer,
    particle_capacity: u64,
    num_particles: u32,

    background: wgpu::Color,

    bind_group: wgpu::BindGroup,
    line_pipeline: wgpu::RenderPipeline,
    dot_pipeline: wgpu::RenderPipeline,
}

impl RenderModule {
    pub fn new(device: &wgpu::Device, swapchain_format: wgpu::TextureFormat) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("render.wgsl"))),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Two triangles covering the unit square around a dot center.
        let corners: [f32; 12] = [
            -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, //
            -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
        ];
        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("dot corners"),
            contents: bytemuck::cast_slice(&corners),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Sized for the default cap up front; grown if the cap is raised.
        let n = particle::MAX_PARTICLES as u64;
        let line_capacity = n * (n - 1) * std::mem::size_of::<LineVertex>() as u64;
        let particle_capacity = n * std::mem::size_of::<Particle>() as u64;
        let line_buffer = create_vertex_buffer(device, "link lines", line_capacity);
        let particle_buffer = create_vertex_buffer(device, "particles", particle_capacity);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("render"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let target = wgpu::ColorTargetState {
            format: swapchain_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        };

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("links"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "line_vertex",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "line_fragment",
                targets: &[Some(target.clone())],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let dot_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("dots"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "dot_vertex",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Particle>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            // position; velocity is skipped
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 0,
                                shader_location: 0,
                            },
                            // radius
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32,
                                offset: 16,
                                shader_location: 1,
                            },
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: 2 * 4,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![2 => Float32x2],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "dot_fragment",
                targets: &[Some(target)],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            globals_buffer,
            corner_buffer,

            line_buffer,
            line_capacity,
            num_line_vertices: 0,

            particle_buffer,
            particle_capacity,
            num_particles: 0,

            background: wgpu::Color::BLACK,

            bind_group,
            line_pipeline,
            dot_pipeline,
        }
    }

    pub fn update_size(&self, queue: &wgpu::Queue, width: u32, height: u32) {
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&[width as f32, height as f32]),
        );
    }

    pub fn update_palette(&mut self, queue: &wgpu::Queue, palette: &Palette) {
        self.background = wgpu::Color {
            r: palette.background[0] as f64,
            g: palette.background[1] as f64,
            b: palette.background[2] as f64,
            a: palette.background[3] as f64,
        };
        queue.write_buffer(&self.globals_buffer, 16, bytemuck::bytes_of(&palette.dot));
        queue.write_buffer(&self.globals_buffer, 32, bytemuck::bytes_of(&palette.line));
    }

    /// Push this frame's particles and links into the vertex buffers.
    pub fn upload_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        particles: &[Particle],
        links: &[Link],
    ) {
        let mut vertices = Vec::with_capacity(links.len() * 2);
        for link in links {
            vertices.push(LineVertex {
                position: link.a.to_array(),
                alpha: link.alpha,
            });
            vertices.push(LineVertex {
                position: link.b.to_array(),
                alpha: link.alpha,
            });
        }

        self.num_line_vertices = vertices.len() as u32;
        self.num_particles = particles.len() as u32;

        let line_bytes: &[u8] = bytemuck::cast_slice(&vertices);
        if line_bytes.len() as u64 > self.line_capacity {
            self.line_capacity = line_bytes.len() as u64;
            self.line_buffer = create_vertex_buffer(device, "link lines", self.line_capacity);
        }
        if !line_bytes.is_empty() {
            queue.write_buffer(&self.line_buffer, 0, line_bytes);
        }

        let particle_bytes: &[u8] = bytemuck::cast_slice(particles);
        if particle_bytes.len() as u64 > self.particle_capacity {
            self.particle_capacity = particle_bytes.len() as u64;
            self.particle_buffer = create_vertex_buffer(device, "particles", self.particle_capacity);
        }
        if !particle_bytes.is_empty() {
            queue.write_buffer(&self.particle_buffer, 0, particle_bytes);
        }
    }

    pub fn begin_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
    ) -> wgpu::RenderPass<'a> {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.background),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_bind_group(0, &self.bind_group, &[]);

        rpass.set_pipeline(&self.line_pipeline);
        rpass.set_vertex_buffer(0, self.line_buffer.slice(..));
        rpass.draw(0..self.num_line_vertices, 0..1);

        rpass.set_pipeline(&self.dot_pipeline);
        rpass.set_vertex_buffer(0, self.particle_buffer.slice(..));
        rpass.set_vertex_buffer(1, self.corner_buffer.slice(..));
        rpass.draw(0..CORNER_VERTICES, 0..self.num_particles);

        rpass
    }
}

fn create_vertex_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
