// Sprite tilemap + blitter.
// A SpriteSource is one RGBA8 image cut into square tiles, numbered row by row.
// `blit` copies a block of tiles into the canvas with flip/scale/invert/tint and
// an optional chroma key, honoring buffer bounds and the clip mask.

use std::collections::HashMap;
use std::path::Path;

use image::DynamicImage;

use crate::draw::put_rgba;
use crate::error::{CanvasError, CanvasResult};
use crate::palette::{BLACK, WHITE};
use crate::types::{ClipMask, Color, PixelBuffer};

/// Tilemap pixels, tile size and the name -> tile index table.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSource {
    tilemap: Vec<u8>,
    width: i32,     // tilemap width in pixels
    tile_size: i32, // square tile edge in pixels
    indices: HashMap<String, u32>,
}

impl SpriteSource {
    /// Wrap a caller-supplied RGBA8 buffer. The buffer must describe a square image
    /// whose side is a power of two.
    pub fn from_rgba(bytes: Vec<u8>, tile_size: i32) -> CanvasResult<Self> {
        if bytes.len() % 4 != 0 {
            return Err(CanvasError::MalformedSprites(format!(
                "{} bytes is not a whole number of RGBA pixels",
                bytes.len()
            )));
        }
        let pixels = bytes.len() / 4;
        let side = (pixels as f64).sqrt() as usize;
        if side * side != pixels || !side.is_power_of_two() {
            return Err(CanvasError::MalformedSprites(format!(
                "{pixels} pixels is not a power-of-two square"
            )));
        }
        Self::validated(bytes, side as i32, tile_size)
    }

    /// Normalize a decoded image to RGBA8. Grey and RGB sources get 255 alpha.
    pub fn from_image(image: DynamicImage, tile_size: i32) -> CanvasResult<Self> {
        let rgba = image.into_rgba8();
        let width = rgba.width() as i32;
        Self::validated(rgba.into_raw(), width, tile_size)
    }

    /// Decode a tilemap image from disk.
    #[tracing::instrument]
    pub fn load(path: &Path, tile_size: i32) -> CanvasResult<Self> {
        let image = image::open(path)?;
        tracing::debug!(width = image.width(), height = image.height(), "decoded tilemap");
        Self::from_image(image, tile_size)
    }

    fn validated(tilemap: Vec<u8>, width: i32, tile_size: i32) -> CanvasResult<Self> {
        if tile_size <= 0 || tile_size > width {
            return Err(CanvasError::MalformedSprites(format!(
                "tile size {tile_size} does not fit a {width}px wide tilemap"
            )));
        }
        Ok(Self { tilemap, width, tile_size, indices: HashMap::new() })
    }

    /// Add name -> tile entries (`"char_a" -> 16`).
    pub fn with_indices<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        self.indices.extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn index_of(&self, key: &str) -> Option<u32> {
        self.indices.get(key).copied()
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        (self.tilemap.len() / 4 / self.width as usize) as i32
    }

    pub fn tilemap(&self) -> &[u8] {
        &self.tilemap
    }

    /// Pixel index of the top-left corner of tile `n`.
    fn tile_origin(&self, n: u32) -> usize {
        let per_row = (self.width / self.tile_size) as usize;
        let (row, column) = (n as usize / per_row, n as usize % per_row);
        row * self.width as usize * self.tile_size as usize + column * self.tile_size as usize
    }

    /// Tilemap pixel; `None` past the end of the tilemap.
    #[inline]
    fn sample(&self, pixel: usize) -> Option<[u8; 4]> {
        let px = self.tilemap.get(pixel * 4..pixel * 4 + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// How a sprite is drawn. Defaults: white tint, one tile, 1x scale, no flip,
/// no invert, black chroma key on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteOptions {
    pub color: Color,
    pub w: u8, // tiles wide
    pub h: u8, // tiles tall
    pub scale_w: u8,
    pub scale_h: u8,
    pub flip_x: bool,
    pub flip_y: bool,
    pub invert: bool,
    pub mask: bool,
    pub mask_color: Color,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            color: WHITE,
            w: 1,
            h: 1,
            scale_w: 1,
            scale_h: 1,
            flip_x: false,
            flip_y: false,
            invert: false,
            mask: true,
            mask_color: BLACK,
        }
    }
}

/// Copy tile block `n` to (x,y).
/// Visual: a `tile*w*scale_w` by `tile*h*scale_h` block of the tilemap appears,
/// nearest-neighbor scaled; chroma-keyed pixels leave the canvas showing through.
pub fn blit(
    fb: &mut PixelBuffer,
    clip: &ClipMask,
    sprites: &SpriteSource,
    n: u32,
    x: i32,
    y: i32,
    opts: &SpriteOptions,
) {
    let tile = sprites.tile_size;
    let src_w = tile * opts.w as i32;
    let src_h = tile * opts.h as i32;
    let (scale_w, scale_h) = (opts.scale_w as i32, opts.scale_h as i32);
    let origin = sprites.tile_origin(n);
    let key = opts.mask_color.to_rgb8();
    let tint = opts.color;

    for jj in 0..src_h * scale_h {
        for ii in 0..src_w * scale_w {
            let (dx, dy) = (x + ii, y + jj);
            if !fb.in_bounds(dx, dy) || !clip.contains(dx, dy) {
                continue;
            }

            let sx = if opts.flip_x { (src_w - 1) - ii / scale_w } else { ii / scale_w };
            let sy = if opts.flip_y { (src_h - 1) - jj / scale_h } else { jj / scale_h };
            let Some([r, g, b, a]) =
                sprites.sample(origin + sx as usize + sy as usize * sprites.width as usize)
            else {
                continue;
            };

            // chroma key on the untouched sample
            if opts.mask && [r, g, b] == key {
                continue;
            }

            let (r, g, b) = if opts.invert { (255 - r, 255 - g, 255 - b) } else { (r, g, b) };
            let out = [
                (r as f32 * tint.r) as u8,
                (g as f32 * tint.g) as u8,
                (b as f32 * tint.b) as u8,
                (a as f32 * tint.a) as u8,
            ];
            put_rgba(fb, clip, dx, dy, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::clear;
    use crate::palette::RED;

    /// 4x4 tilemap of 2x2 tiles. Tile n is filled with (n*10+1, n*10+2, n*10+3, 255),
    /// except tile 3, which has a black background and one white pixel at its top-left.
    fn tiles() -> SpriteSource {
        let mut bytes = vec![0u8; 4 * 4 * 4];
        for y in 0..4 {
            for x in 0..4 {
                let n = (y / 2) * 2 + x / 2;
                let px = if n == 3 {
                    if x == 2 && y == 2 { [255, 255, 255, 255] } else { [0, 0, 0, 255] }
                } else {
                    let base = n as u8 * 10;
                    [base + 1, base + 2, base + 3, 255]
                };
                let i = (y * 4 + x) * 4;
                bytes[i..i + 4].copy_from_slice(&px);
            }
        }
        SpriteSource::from_rgba(bytes, 2).unwrap()
    }

    fn canvas(w: i32, h: i32) -> PixelBuffer {
        let mut fb = PixelBuffer::new(w, h);
        clear(&mut fb, &ClipMask::Unclipped, Color::rgb(0.0, 0.0, 1.0));
        fb
    }

    const BG: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn in_memory_source_must_be_power_of_two_square() {
        assert!(SpriteSource::from_rgba(vec![0; 4 * 16], 2).is_ok());
        assert!(matches!(
            SpriteSource::from_rgba(vec![0; 4 * 16 + 1], 2),
            Err(CanvasError::MalformedSprites(_))
        ));
        assert!(SpriteSource::from_rgba(vec![0; 4 * 12], 2).is_err());
        assert!(SpriteSource::from_rgba(vec![0; 4 * 9], 1).is_err());
        assert!(SpriteSource::from_rgba(Vec::new(), 1).is_err());
        assert!(SpriteSource::from_rgba(vec![0; 4 * 16], 0).is_err());
        assert!(SpriteSource::from_rgba(vec![0; 4 * 16], 8).is_err());
    }

    #[test]
    fn greyscale_images_expand_to_opaque_rgba() {
        let grey = image::GrayImage::from_raw(2, 2, vec![7, 8, 9, 10]).unwrap();
        let src = SpriteSource::from_image(DynamicImage::ImageLuma8(grey), 1).unwrap();
        assert_eq!(src.width(), 2);
        assert_eq!(src.height(), 2);
        assert_eq!(&src.tilemap()[12..16], &[10, 10, 10, 255]);
    }

    #[test]
    fn tiles_are_numbered_row_by_row() {
        let src = tiles();
        assert_eq!(src.tile_origin(0), 0);
        assert_eq!(src.tile_origin(1), 2);
        assert_eq!(src.tile_origin(2), 8);
        assert_eq!(src.tile_origin(3), 10);
    }

    #[test]
    fn blit_copies_one_tile() {
        let mut fb = canvas(4, 4);
        let opts = SpriteOptions { mask: false, ..Default::default() };
        blit(&mut fb, &ClipMask::Unclipped, &tiles(), 2, 1, 1, &opts);
        for y in 0..4 {
            for x in 0..4 {
                let expected = if (1..3).contains(&x) && (1..3).contains(&y) { [21, 22, 23, 255] } else { BG };
                assert_eq!(fb.pixel(x, y), Some(expected), "({x},{y})");
            }
        }
    }

    #[test]
    fn blit_scales_and_flips() {
        let src = tiles();
        let mut fb = canvas(8, 8);
        let opts = SpriteOptions { scale_w: 2, scale_h: 2, flip_x: true, flip_y: true, mask: false, ..Default::default() };
        blit(&mut fb, &ClipMask::Unclipped, &src, 3, 0, 0, &opts);
        // The single white source pixel sits at tile (0,0); flipped it lands at (1,1),
        // scaled to the 2x2 block at (2..4, 2..4).
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x >= 2 && y >= 2 { [255; 4] } else { [0, 0, 0, 255] };
                assert_eq!(fb.pixel(x, y), Some(expected), "({x},{y})");
            }
        }
        assert_eq!(fb.pixel(4, 4), Some(BG));
    }

    #[test]
    fn blit_spans_multiple_tiles() {
        let mut fb = canvas(4, 4);
        let opts = SpriteOptions { w: 2, mask: false, ..Default::default() };
        blit(&mut fb, &ClipMask::Unclipped, &tiles(), 0, 0, 0, &opts);
        assert_eq!(fb.pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(fb.pixel(3, 1), Some([11, 12, 13, 255]));
        assert_eq!(fb.pixel(0, 2), Some(BG));
    }

    #[test]
    fn tint_multiplies_and_truncates() {
        let mut fb = canvas(2, 2);
        let opts = SpriteOptions { color: Color::new(0.5, 1.0, 0.0, 0.5), mask: false, ..Default::default() };
        blit(&mut fb, &ClipMask::Unclipped, &tiles(), 1, 0, 0, &opts);
        // (11,12,13,255) * (0.5,1,0,0.5)
        assert_eq!(fb.pixel(0, 0), Some([5, 12, 0, 127]));
    }

    #[test]
    fn invert_flips_rgb_only() {
        let mut fb = canvas(2, 2);
        let opts = SpriteOptions { invert: true, mask: false, ..Default::default() };
        blit(&mut fb, &ClipMask::Unclipped, &tiles(), 0, 0, 0, &opts);
        assert_eq!(fb.pixel(1, 1), Some([254, 253, 252, 255]));
    }

    #[test]
    fn chroma_key_tests_the_sample_before_invert() {
        let src = tiles();
        for invert in [false, true] {
            let mut fb = canvas(2, 2);
            let opts = SpriteOptions { invert, mask: true, mask_color: BLACK, ..Default::default() };
            blit(&mut fb, &ClipMask::Unclipped, &src, 3, 0, 0, &opts);
            let white_out = if invert { [0, 0, 0, 255] } else { [255; 4] };
            assert_eq!(fb.pixel(0, 0), Some(white_out));
            assert_eq!(fb.pixel(1, 0), Some(BG));
            assert_eq!(fb.pixel(0, 1), Some(BG));
            assert_eq!(fb.pixel(1, 1), Some(BG));
        }
    }

    #[test]
    fn chroma_key_ignores_alpha_and_tint() {
        let src = tiles();
        let mut fb = canvas(2, 2);
        let opts = SpriteOptions {
            color: RED,
            mask_color: Color::new(11.0 / 255.0 + 1e-4, 12.0 / 255.0 + 1e-4, 13.0 / 255.0 + 1e-4, 0.0),
            ..Default::default()
        };
        blit(&mut fb, &ClipMask::Unclipped, &src, 1, 0, 0, &opts);
        assert_eq!(fb.pixel(0, 0), Some(BG));
    }

    #[test]
    fn blit_skips_off_buffer_and_clipped_pixels() {
        let mut fb = canvas(3, 3);
        let clip = ClipMask::from_corners(0, 0, 3, 1).unwrap();
        let opts = SpriteOptions { mask: false, ..Default::default() };
        blit(&mut fb, &clip, &tiles(), 0, 2, -1, &opts);
        // Only (2,0) is in bounds, in the clip and covered by the tile.
        assert_eq!(fb.pixel(2, 0), Some([1, 2, 3, 255]));
        assert_eq!(fb.pixel(2, 1), Some(BG));
        assert_eq!(fb.pixel(1, 0), Some(BG));
    }
}
