//! GPU textures with procedural fallbacks
//!
//! Image files are decoded with the `image` crate; a missing or corrupt file
//! substitutes a two-color checkerboard so the game always has something to
//! draw.

use image::{Rgba, RgbaImage};

const FALLBACK_SIZE: u32 = 64;
const FALLBACK_CHECKER: u32 = 16;

pub struct GpuTexture {
    pub bind_group: wgpu::BindGroup,
    _texture: wgpu::Texture,
}

impl GpuTexture {
    /// Load an RGBA texture from disk, falling back to a checkerboard of the
    /// two given colors on failure.
    pub fn from_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        path: &str,
        fallback_a: [f32; 3],
        fallback_b: [f32; 3],
    ) -> Self {
        let rgba = match image::open(path) {
            // Flip so row zero lands at the bottom of the y-up quad.
            Ok(img) => {
                log::info!("Loaded texture {path}");
                img.flipv().to_rgba8()
            }
            Err(err) => {
                log::warn!("Texture {path} failed to load ({err}); using procedural fallback");
                checkerboard(fallback_a, fallback_b)
            }
        };
        let (width, height) = rgba.dimensions();
        Self::from_rgba(device, queue, layout, sampler, &rgba, width, height, path)
    }

    /// A 1x1 white texture bound for untextured draws.
    pub fn white(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        Self::from_rgba(
            device,
            queue,
            layout,
            sampler,
            &[255, 255, 255, 255],
            1,
            1,
            "white",
        )
    }

    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        pixels: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        Self::upload(
            device,
            queue,
            layout,
            sampler,
            pixels,
            width,
            height,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            4,
            label,
        )
    }

    /// Single-channel texture for the glyph atlas coverage mask.
    pub fn from_alpha(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        pixels: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        Self::upload(
            device,
            queue,
            layout,
            sampler,
            pixels,
            width,
            height,
            wgpu::TextureFormat::R8Unorm,
            1,
            label,
        )
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        bytes_per_pixel: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_pixel * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            bind_group,
            _texture: texture,
        }
    }
}

/// Two-color checkerboard matching the original asset footprint.
fn checkerboard(color_a: [f32; 3], color_b: [f32; 3]) -> RgbaImage {
    let to_rgba = |c: [f32; 3]| {
        Rgba([
            (c[0] * 255.0) as u8,
            (c[1] * 255.0) as u8,
            (c[2] * 255.0) as u8,
            255,
        ])
    };
    let (a, b) = (to_rgba(color_a), to_rgba(color_b));
    RgbaImage::from_fn(FALLBACK_SIZE, FALLBACK_SIZE, |x, y| {
        if (x / FALLBACK_CHECKER + y / FALLBACK_CHECKER) % 2 == 0 {
            a
        } else {
            b
        }
    })
}
