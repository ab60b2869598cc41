//! WebGPU render pipeline
//!
//! One pipeline, one unit quad, one uniform slot per draw. Draw order is
//! fixed: world bodies, then particles, then popup text, then the score
//! readout.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use wgpu::util::DeviceExt;

use crate::config::Config;
use crate::game::GameState;
use crate::game::particles::PARTICLE_TINT;
use crate::world_to_screen;

use super::text::{FontAtlas, GlyphQuad};
use super::texture::GpuTexture;

/// Per-draw uniform slots available per frame; draws past this are dropped.
const MAX_QUADS: usize = 1024;
/// Uniform slot stride (device offset alignment)
const QUAD_STRIDE: u64 = 256;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.15,
    a: 1.0,
};
const SCORE_COLOR: [f32; 3] = [0.92, 0.92, 0.95];
const SCORE_TEXT_SCALE: f32 = 0.75;

const MODE_SOLID: u32 = 0;
const MODE_TEXTURED: u32 = 1;
const MODE_GLYPH: u32 = 2;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct QuadUniform {
    mvp: [[f32; 4]; 4],
    tint: [f32; 4],
    uv_rect: [f32; 4],
    mode: u32,
    _pad: [u32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    uv: [f32; 2],
}

impl Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Centered unit quad; scaled per draw by the model matrix.
const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [-0.5, -0.5],
        uv: [0.0, 0.0],
    },
    Vertex {
        position: [0.5, -0.5],
        uv: [1.0, 0.0],
    },
    Vertex {
        position: [0.5, 0.5],
        uv: [1.0, 1.0],
    },
    Vertex {
        position: [-0.5, 0.5],
        uv: [0.0, 1.0],
    },
];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Which texture bind group a draw uses.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    White,
    Player,
    Crate,
    Ground,
    Font,
}

pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    quad_buffer: wgpu::Buffer,
    quad_bind_group: wgpu::BindGroup,

    white: GpuTexture,
    player_tex: GpuTexture,
    crate_tex: GpuTexture,
    ground_tex: GpuTexture,
    font: Option<FontAtlas>,

    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        game_config: &Config,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("bumpbox-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
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
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Bind group 0: one uniform slot per draw, selected by dynamic offset
        let quad_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // Bind group 1: the texture sampled by textured/glyph draws
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&quad_layout, &texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let quad_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_uniforms"),
            size: QUAD_STRIDE * MAX_QUADS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let quad_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad_bind_group"),
            layout: &quad_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &quad_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<QuadUniform>() as u64),
                }),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quad_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = GpuTexture::white(&device, &queue, &texture_layout, &sampler);
        let player_tex = GpuTexture::from_file(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            &game_config.player_texture,
            [0.9, 0.3, 0.25],
            [0.7, 0.2, 0.2],
        );
        let crate_tex = GpuTexture::from_file(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            &game_config.crate_texture,
            [0.2, 0.5, 0.8],
            [0.1, 0.3, 0.6],
        );
        let ground_tex = GpuTexture::from_file(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            &game_config.ground_texture,
            [0.4, 0.6, 0.3],
            [0.3, 0.5, 0.2],
        );
        let font = FontAtlas::load(&device, &queue, &texture_layout, &sampler, &game_config.font);

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            index_buffer,
            quad_buffer,
            quad_bind_group,
            white,
            player_tex,
            crate_tex,
            ground_tex,
            font,
            size: (width, height),
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

    /// Draw the current game state.
    pub fn render(&mut self, state: &GameState) -> Result<(), wgpu::SurfaceError> {
        let draws = self.build_draws(state);

        // Pack each uniform into its aligned slot and upload in one write.
        let mut staging = vec![0u8; draws.len() * QUAD_STRIDE as usize];
        for (i, (uniform, _)) in draws.iter().enumerate() {
            let offset = i * QUAD_STRIDE as usize;
            staging[offset..offset + std::mem::size_of::<QuadUniform>()]
                .copy_from_slice(bytemuck::bytes_of(uniform));
        }
        if !staging.is_empty() {
            self.queue.write_buffer(&self.quad_buffer, 0, &staging);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
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
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (i, (_, slot)) in draws.iter().enumerate() {
                let offset = (i as u64 * QUAD_STRIDE) as u32;
                render_pass.set_bind_group(0, &self.quad_bind_group, &[offset]);
                render_pass.set_bind_group(1, &self.texture_for(*slot).bind_group, &[]);
                render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn texture_for(&self, slot: Slot) -> &GpuTexture {
        match slot {
            Slot::White => &self.white,
            Slot::Player => &self.player_tex,
            Slot::Crate => &self.crate_tex,
            Slot::Ground => &self.ground_tex,
            Slot::Font => self
                .font
                .as_ref()
                .map(|f| &f.texture)
                .unwrap_or(&self.white),
        }
    }

    /// Build this frame's draw list in submission order.
    fn build_draws(&self, state: &GameState) -> Vec<(QuadUniform, Slot)> {
        let viewport = Vec2::new(self.size.0 as f32, self.size.1 as f32);
        let proj = Mat4::orthographic_rh(0.0, viewport.x, 0.0, viewport.y, -1.0, 1.0);
        let ppm = state.config.pixels_per_meter;
        let mut draws: Vec<(QuadUniform, Slot)> = Vec::with_capacity(64);

        // World bodies: ground, player, target
        let bodies = [
            (&state.entities.ground, Slot::Ground),
            (&state.entities.player, Slot::Player),
            (&state.entities.target, Slot::Crate),
        ];
        for (entity, slot) in bodies {
            let pos = state.physics.position(entity.body);
            let angle = state.physics.rotation(entity.body);
            let visual = &entity.visual;
            let center = world_to_screen(pos, viewport, ppm);
            let size = entity.half_extents * 2.0 * ppm * visual.anim_scale;
            let (mode, slot) = if visual.textured {
                (MODE_TEXTURED, slot)
            } else {
                (MODE_SOLID, Slot::White)
            };
            let tint = [visual.tint[0], visual.tint[1], visual.tint[2], 1.0];
            draws.push((screen_quad(&proj, center, size, angle, tint, mode), slot));
        }

        // Particles: life-faded billboards
        for particle in state.particles.iter() {
            if draws.len() >= MAX_QUADS {
                break;
            }
            let center = world_to_screen(particle.pos, viewport, ppm);
            let size = Vec2::splat(particle.size * ppm);
            let tint = [
                PARTICLE_TINT[0],
                PARTICLE_TINT[1],
                PARTICLE_TINT[2],
                particle.life_fraction(),
            ];
            draws.push((
                screen_quad(&proj, center, size, particle.rotation, tint, MODE_SOLID),
                Slot::White,
            ));
        }

        // Text overlays need a usable font; otherwise they are skipped.
        if let Some(font) = &self.font {
            let mut quads: Vec<GlyphQuad> = Vec::new();

            // Popups: shadow first, main text on top, both alpha-faded
            for popup in state.popups.iter() {
                let alpha = popup.alpha();

                quads.clear();
                font.glyphs
                    .layout(&popup.text, popup.pos + popup.shadow_offset, popup.scale, &mut quads);
                let shadow = [
                    popup.shadow_color[0],
                    popup.shadow_color[1],
                    popup.shadow_color[2],
                    alpha,
                ];
                push_glyphs(&mut draws, &proj, &quads, shadow);

                quads.clear();
                font.glyphs.layout(&popup.text, popup.pos, popup.scale, &mut quads);
                let color = [popup.color[0], popup.color[1], popup.color[2], alpha];
                push_glyphs(&mut draws, &proj, &quads, color);
            }

            // Persistent score readout, anchored top-left
            let readout = format!("SCORE {}", state.score);
            let anchor = Vec2::new(16.0, viewport.y - 40.0);
            quads.clear();
            font.glyphs.layout(&readout, anchor, SCORE_TEXT_SCALE, &mut quads);
            let color = [SCORE_COLOR[0], SCORE_COLOR[1], SCORE_COLOR[2], 1.0];
            push_glyphs(&mut draws, &proj, &quads, color);
        }

        draws.truncate(MAX_QUADS);
        draws
    }
}

fn screen_quad(
    proj: &Mat4,
    center: Vec2,
    size: Vec2,
    rotation: f32,
    tint: [f32; 4],
    mode: u32,
) -> QuadUniform {
    let model = Mat4::from_translation(center.extend(0.0))
        * Mat4::from_rotation_z(rotation)
        * Mat4::from_scale(size.extend(1.0));
    QuadUniform {
        mvp: (*proj * model).to_cols_array_2d(),
        tint,
        uv_rect: [0.0, 0.0, 1.0, 1.0],
        mode,
        _pad: [0; 3],
    }
}

fn push_glyphs(
    draws: &mut Vec<(QuadUniform, Slot)>,
    proj: &Mat4,
    quads: &[GlyphQuad],
    tint: [f32; 4],
) {
    for quad in quads {
        if draws.len() >= MAX_QUADS {
            return;
        }
        let mut uniform = screen_quad(proj, quad.center, quad.size, 0.0, tint, MODE_GLYPH);
        uniform.uv_rect = quad.uv_rect;
        draws.push((uniform, Slot::Font));
    }
}
