//! SDF-based WebGPU render pipeline
//!
//! Renders the entire table in the fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::scene::{Scene, SceneHole};

/// Maximum number of holes the shader iterates over
pub const MAX_HOLES: usize = 64;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],  // offset 0
    line_start: [f32; 2],  // offset 8
    line_end: [f32; 2],    // offset 16
    ball_center: [f32; 2], // offset 24
    line_width: f32,       // offset 32
    ball_radius: f32,      // offset 36
    ball_scale: f32,       // offset 40
    ball_opacity: f32,     // offset 44
    hole_count: u32,       // offset 48
    pixel_ratio: f32,      // offset 52
    _pad: [u32; 2],        // offset 56 - align posts to 16 bytes
    left_post: [f32; 4],   // offset 64 (x, y, w, h)
    right_post: [f32; 4],  // offset 80
}

impl Globals {
    fn from_scene(scene: &Scene, size: (u32, u32), pixel_ratio: f32) -> Self {
        let rect = |i: usize| {
            let r = scene.posts[i];
            [r.origin.x, r.origin.y, r.size.x, r.size.y]
        };
        Self {
            resolution: [size.0 as f32, size.1 as f32],
            line_start: scene.line_start.to_array(),
            line_end: scene.line_end.to_array(),
            ball_center: scene.ball_center.to_array(),
            line_width: scene.line_width,
            ball_radius: scene.ball_radius,
            ball_scale: scene.ball_scale,
            ball_opacity: scene.ball_opacity,
            hole_count: scene.holes.len().min(MAX_HOLES) as u32,
            pixel_ratio,
            _pad: [0; 2],
            left_post: rect(0),
            right_post: rect(1),
        }
    }
}

/// Label bits the shader can show as pips
const LABEL_PIPS: u32 = 6;

/// Pack a hole's label and winning flag: bit 0 is winning, the label sits above it
fn hole_code(hole: &SceneHole) -> f32 {
    let label = hole.label & ((1 << LABEL_PIPS) - 1);
    ((label << 1) | hole.winning as u32) as f32
}

/// Hole record as uploaded: (center x, center y, radius, code)
fn hole_data(scene: &Scene) -> Vec<[f32; 4]> {
    let mut data = vec![[0.0; 4]; MAX_HOLES];
    for (slot, hole) in data.iter_mut().zip(&scene.holes) {
        *slot = [
            hole.center.x,
            hole.center.y,
            hole.radius,
            hole_code(hole),
        ];
    }
    data
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    holes_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    /// Physical pixels per container pixel
    pixel_ratio: f32,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        pixel_ratio: f32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{} @ {}x", width, height, pixel_ratio);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        // Uniform arrays need a 16-byte stride, hence vec4 per hole
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let holes_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("holes"),
            contents: bytemuck::cast_slice(&vec![[0.0_f32; 4]; MAX_HOLES]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: holes_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            holes_buffer,
            bind_group,
            size: (width, height),
            pixel_ratio,
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the scene and draw one frame. The surface is cleared every
    /// frame, so nothing from the previous line survives.
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let globals = Globals::from_scene(scene, self.size, self.pixel_ratio);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue
            .write_buffer(&self.holes_buffer, 0, bytemuck::cast_slice(&hole_data(scene)));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
