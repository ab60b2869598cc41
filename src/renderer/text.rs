//! Bitmap-font glyphs
//!
//! The first 128 ASCII glyphs of a TTF file are rasterized once into a
//! single-channel atlas; layout walks a pen position by each glyph's advance
//! metric. A missing font disables text rendering entirely rather than
//! substituting anything.

use glam::Vec2;
use rusttype::{Font, Scale, point};

use super::texture::GpuTexture;

/// Rasterization size; popups and the readout scale from here.
pub const FONT_PX: f32 = 32.0;

const GLYPH_COUNT: usize = 128;
const CELL: u32 = 40;
const COLS: u32 = 16;
const ROWS: u32 = 8;
const ATLAS_W: u32 = COLS * CELL;
const ATLAS_H: u32 = ROWS * CELL;

#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphInfo {
    /// Atlas UV rect as offset + scale; the v scale is negative so that
    /// y-up quads sample the glyph right side up.
    pub uv_rect: [f32; 4],
    /// Bitmap size in pixels at `FONT_PX`
    pub size: Vec2,
    /// Bitmap offset from the pen position (y-down from the baseline)
    pub bearing: Vec2,
    /// Pen advance in pixels at `FONT_PX`
    pub advance: f32,
}

/// One laid-out glyph, ready to be drawn as a quad.
#[derive(Debug, Clone, Copy)]
pub struct GlyphQuad {
    pub center: Vec2,
    pub size: Vec2,
    pub uv_rect: [f32; 4],
}

/// CPU side of the font: metrics and layout, no GPU resources. Split out so
/// layout is testable without a device.
pub struct GlyphSet {
    glyphs: Vec<GlyphInfo>,
}

impl GlyphSet {
    pub fn new(glyphs: Vec<GlyphInfo>) -> Self {
        Self { glyphs }
    }

    fn glyph(&self, ch: char) -> Option<&GlyphInfo> {
        self.glyphs.get(ch as usize)
    }

    /// Lay out `text` with its baseline starting at `baseline`, producing one
    /// quad per visible glyph. Characters outside the atlas range are
    /// skipped. Screen space is y-up.
    pub fn layout(&self, text: &str, baseline: Vec2, scale: f32, out: &mut Vec<GlyphQuad>) {
        let mut pen_x = baseline.x;
        for ch in text.chars() {
            let Some(info) = self.glyph(ch) else { continue };
            if info.size.x > 0.0 {
                let center = Vec2::new(
                    pen_x + (info.bearing.x + info.size.x * 0.5) * scale,
                    baseline.y - (info.bearing.y + info.size.y * 0.5) * scale,
                );
                out.push(GlyphQuad {
                    center,
                    size: info.size * scale,
                    uv_rect: info.uv_rect,
                });
            }
            pen_x += info.advance * scale;
        }
    }

    /// Advance-width of `text` at the given scale.
    pub fn measure(&self, text: &str, scale: f32) -> f32 {
        text.chars()
            .filter_map(|ch| self.glyph(ch))
            .map(|info| info.advance * scale)
            .sum()
    }
}

/// Glyph metrics plus the GPU atlas they index into.
pub struct FontAtlas {
    pub glyphs: GlyphSet,
    pub texture: GpuTexture,
}

impl FontAtlas {
    /// Rasterize the ASCII range of the font at `path`. Returns `None` (with
    /// a warning) when the file is missing or not a usable font; callers
    /// then skip text rendering.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        path: &str,
    ) -> Option<Self> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("Font {path} failed to load ({err}); text rendering disabled");
                return None;
            }
        };
        let Some(font) = Font::try_from_vec(data) else {
            log::warn!("Font {path} is not a usable TTF; text rendering disabled");
            return None;
        };

        let scale = Scale::uniform(FONT_PX);
        let mut pixels = vec![0u8; (ATLAS_W * ATLAS_H) as usize];
        let mut glyphs = Vec::with_capacity(GLYPH_COUNT);

        for id in 0..GLYPH_COUNT as u32 {
            let ch = id as u8 as char;
            let glyph = font.glyph(ch).scaled(scale);
            let advance = glyph.h_metrics().advance_width;
            let positioned = glyph.positioned(point(0.0, 0.0));

            let mut info = GlyphInfo {
                advance,
                ..Default::default()
            };

            if let Some(bb) = positioned.pixel_bounding_box() {
                let w = (bb.max.x - bb.min.x).max(0) as u32;
                let h = (bb.max.y - bb.min.y).max(0) as u32;
                let cell_x = (id % COLS) * CELL;
                let cell_y = (id / COLS) * CELL;

                positioned.draw(|gx, gy, coverage| {
                    if gx < CELL && gy < CELL {
                        let px = cell_x + gx;
                        let py = cell_y + gy;
                        pixels[(py * ATLAS_W + px) as usize] = (coverage * 255.0) as u8;
                    }
                });

                let w_clamped = w.min(CELL) as f32;
                let h_clamped = h.min(CELL) as f32;
                info.size = Vec2::new(w_clamped, h_clamped);
                info.bearing = Vec2::new(bb.min.x as f32, bb.min.y as f32);
                info.uv_rect = [
                    cell_x as f32 / ATLAS_W as f32,
                    (cell_y as f32 + h_clamped) / ATLAS_H as f32,
                    w_clamped / ATLAS_W as f32,
                    -h_clamped / ATLAS_H as f32,
                ];
            }
            glyphs.push(info);
        }

        log::info!("Rasterized {GLYPH_COUNT}-glyph atlas from {path}");
        let texture = GpuTexture::from_alpha(
            device, queue, layout, sampler, &pixels, ATLAS_W, ATLAS_H, "font-atlas",
        );
        Some(Self {
            glyphs: GlyphSet::new(glyphs),
            texture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A synthetic fixed-metric glyph set: every printable glyph is a 10x20
    /// bitmap with a 12px advance, bearing (1, -18).
    fn fixed_set() -> GlyphSet {
        let mut glyphs = vec![GlyphInfo::default(); GLYPH_COUNT];
        for info in glyphs.iter_mut().skip(b'!' as usize) {
            *info = GlyphInfo {
                uv_rect: [0.0, 0.5, 0.1, -0.5],
                size: Vec2::new(10.0, 20.0),
                bearing: Vec2::new(1.0, -18.0),
                advance: 12.0,
            };
        }
        // Space advances without producing a quad.
        glyphs[b' ' as usize].advance = 12.0;
        GlyphSet::new(glyphs)
    }

    #[test]
    fn test_layout_advances_pen() {
        let set = fixed_set();
        let mut quads = Vec::new();
        set.layout("+10", Vec2::new(100.0, 50.0), 1.0, &mut quads);
        assert_eq!(quads.len(), 3);
        // Each successive glyph starts one advance further along.
        assert!((quads[1].center.x - quads[0].center.x - 12.0).abs() < 1e-5);
        assert!((quads[2].center.x - quads[1].center.x - 12.0).abs() < 1e-5);
    }

    #[test]
    fn test_layout_scales_advance_and_size() {
        let set = fixed_set();
        let mut quads = Vec::new();
        set.layout("AB", Vec2::ZERO, 2.0, &mut quads);
        assert_eq!(quads[0].size, Vec2::new(20.0, 40.0));
        assert!((quads[1].center.x - quads[0].center.x - 24.0).abs() < 1e-5);
    }

    #[test]
    fn test_space_advances_without_quad() {
        let set = fixed_set();
        let mut quads = Vec::new();
        set.layout("a b", Vec2::ZERO, 1.0, &mut quads);
        assert_eq!(quads.len(), 2);
        assert!((quads[1].center.x - quads[0].center.x - 24.0).abs() < 1e-5);
    }

    #[test]
    fn test_glyph_sits_above_baseline() {
        let set = fixed_set();
        let mut quads = Vec::new();
        set.layout("A", Vec2::new(0.0, 100.0), 1.0, &mut quads);
        // Bearing y is -18 (y-down): the glyph body renders above the
        // baseline in y-up screen space.
        assert!(quads[0].center.y > 100.0);
    }

    #[test]
    fn test_non_ascii_skipped() {
        let set = fixed_set();
        let mut quads = Vec::new();
        set.layout("a\u{263a}b", Vec2::ZERO, 1.0, &mut quads);
        assert_eq!(quads.len(), 2);
    }

    #[test]
    fn test_measure() {
        let set = fixed_set();
        assert!((set.measure("+10", 1.0) - 36.0).abs() < 1e-5);
        assert!((set.measure("+10", 0.5) - 18.0).abs() < 1e-5);
    }
}
