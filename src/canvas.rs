// The canvas: one pixel buffer, its clip mask and the optional sprite source.
// Drawing calls forward to `draw`, `sprite`, `text` and `export` with the clip passed
// explicitly.

use std::path::Path;

use crate::config::CanvasConfig;
use crate::draw;
use crate::error::{CanvasError, CanvasResult};
use crate::export::{self, PrintSpooler, SystemSpooler};
use crate::palette::BLACK;
use crate::sprite::{self, SpriteOptions, SpriteSource};
use crate::text::{self, TextOptions};
use crate::types::{ClipMask, Color, PixelBuffer, Vec2};

#[derive(Clone, Debug, Default)]
pub struct Canvas {
    buffer: PixelBuffer,
    clip: ClipMask,
    sprites: Option<SpriteSource>,
}

impl Canvas {
    /// A `width` x `height` canvas cleared to opaque black, unclipped, without sprites.
    pub fn new(width: i32, height: i32) -> Self {
        let mut canvas = Self::default();
        canvas.resize(width, height);
        canvas
    }

    /// Canvas sized for a window: `window / render_scale` canvas pixels.
    pub fn for_window(window_width: i32, window_height: i32, render_scale: i32) -> Self {
        let scale = render_scale.max(1);
        Self::new(window_width / scale, window_height / scale)
    }

    /// Build from settings. `sprites_override` is an in-memory RGBA8 tilemap used
    /// instead of `sprites_filename`.
    #[tracing::instrument(skip(sprites_override))]
    pub fn from_config(config: &CanvasConfig, sprites_override: Option<Vec<u8>>) -> CanvasResult<Self> {
        let source = match (sprites_override, &config.sprites_filename) {
            (Some(bytes), _) => SpriteSource::from_rgba(bytes, config.sprite_size)?,
            (None, Some(path)) => SpriteSource::load(path, config.sprite_size)?,
            (None, None) => {
                return Err(CanvasError::Config("no sprites_filename and no in-memory sprites".into()));
            }
        };
        let source = source.with_indices(config.sprite_indices());

        let mut canvas = Self::new(config.width, config.height);
        canvas.set_sprites(source);
        tracing::info!(width = config.width, height = config.height, "canvas ready");
        Ok(canvas)
    }

    /// Reallocate the buffer and clear it to black.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.buffer.resize(width, height);
        draw::clear(&mut self.buffer, &ClipMask::Unclipped, BLACK);
    }

    pub fn width(&self) -> i32 {
        self.buffer.width()
    }

    pub fn height(&self) -> i32 {
        self.buffer.height()
    }

    /// RGBA8 bytes, row-major; one snapshot per presented frame.
    pub fn raw(&self) -> &[u8] {
        self.buffer.raw()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.buffer.pixel(x, y)
    }

    pub fn set_sprites(&mut self, sprites: SpriteSource) {
        self.sprites = Some(sprites);
    }

    pub fn sprites(&self) -> Option<&SpriteSource> {
        self.sprites.as_ref()
    }

    /* ---------- Clip mask ---------- */

    /// Remove the clip mask.
    pub fn reset_clip(&mut self) {
        self.clip = ClipMask::Unclipped;
    }

    /// Only pixels in `[x1,x2) x [y1,y2)` may be painted from now on.
    /// Inverted corners are an error and keep the previous mask.
    pub fn clip(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> CanvasResult<()> {
        self.clip = ClipMask::from_corners(x1, y1, x2, y2)?;
        Ok(())
    }

    pub fn clip_mask(&self) -> ClipMask {
        self.clip
    }

    /* ---------- Primitives ---------- */

    pub fn pset(&mut self, x: i32, y: i32, color: Color) {
        draw::pset(&mut self.buffer, &self.clip, x, y, color);
    }

    pub fn clear(&mut self, color: Color) {
        draw::clear(&mut self.buffer, &self.clip, color);
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        draw::line(&mut self.buffer, &self.clip, x1, y1, x2, y2, color);
    }

    pub fn circle(&mut self, xc: i32, yc: i32, r: i32, color: Color) {
        draw::circle(&mut self.buffer, &self.clip, xc, yc, r, color);
    }

    pub fn circle_fill(&mut self, xc: i32, yc: i32, r: i32, color: Color) {
        draw::circle_fill(&mut self.buffer, &self.clip, xc, yc, r, color);
    }

    pub fn rectangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        draw::rectangle(&mut self.buffer, &self.clip, x1, y1, x2, y2, color);
    }

    pub fn rectangle_fill(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        draw::rectangle_fill(&mut self.buffer, &self.clip, x1, y1, x2, y2, color);
    }

    pub fn triangle_fill(&mut self, v0: impl Into<Vec2>, v1: impl Into<Vec2>, v2: impl Into<Vec2>, color: Color) {
        draw::triangle_fill(&mut self.buffer, &self.clip, v0.into(), v1.into(), v2.into(), color);
    }

    /* ---------- Sprites and text ---------- */

    /// Blit sprite `n` at (x,y).
    pub fn sprite(&mut self, n: u32, x: i32, y: i32, opts: &SpriteOptions) -> CanvasResult<()> {
        let sprites = self.sprites.as_ref().ok_or(CanvasError::SpritesNotLoaded)?;
        sprite::blit(&mut self.buffer, &self.clip, sprites, n, x, y, opts);
        Ok(())
    }

    /// Blit the sprite registered under `name` in the index table.
    pub fn sprite_named(&mut self, name: &str, x: i32, y: i32, opts: &SpriteOptions) -> CanvasResult<()> {
        let sprites = self.sprites.as_ref().ok_or(CanvasError::SpritesNotLoaded)?;
        let n = sprites
            .index_of(name)
            .ok_or_else(|| CanvasError::MissingSpriteIndex(name.to_string()))?;
        sprite::blit(&mut self.buffer, &self.clip, sprites, n, x, y, opts);
        Ok(())
    }

    pub fn print(&mut self, text: &str, x: i32, y: i32, opts: &TextOptions) -> CanvasResult<()> {
        let sprites = self.sprites.as_ref().ok_or(CanvasError::SpritesNotLoaded)?;
        text::print(&mut self.buffer, &self.clip, sprites, text, x, y, opts)
    }

    /* ---------- Export ---------- */

    /// Save the canvas (or just the clipped part) as an image file.
    pub fn write_image(&self, path: impl AsRef<Path>) -> CanvasResult<()> {
        export::write_image(&self.buffer, &self.clip, path.as_ref())
    }

    /// Print the canvas (or just the clipped part) through the host spooler.
    pub fn send_to_printer(&self, printer: &str) -> CanvasResult<()> {
        self.send_to_printer_with(&SystemSpooler, printer)
    }

    pub fn send_to_printer_with(&self, spooler: &dyn PrintSpooler, printer: &str) -> CanvasResult<()> {
        export::send_to_printer(&self.buffer, &self.clip, printer, spooler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::WHITE;

    #[test]
    fn new_canvas_is_opaque_black_and_unclipped() {
        let canvas = Canvas::new(3, 2);
        assert_eq!(canvas.raw().len(), 3 * 2 * 4);
        assert!(canvas.raw().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
        assert_eq!(canvas.clip_mask(), ClipMask::Unclipped);
        assert!(canvas.sprites().is_none());
    }

    #[test]
    fn window_resolution_divides_by_render_scale() {
        let canvas = Canvas::for_window(640, 480, 4);
        assert_eq!((canvas.width(), canvas.height()), (160, 120));
    }

    #[test]
    fn sprite_calls_need_a_source() {
        let mut canvas = Canvas::new(4, 4);
        assert!(matches!(
            canvas.sprite(0, 0, 0, &SpriteOptions::default()),
            Err(CanvasError::SpritesNotLoaded)
        ));
        assert!(matches!(
            canvas.print("a", 0, 0, &TextOptions::default()),
            Err(CanvasError::SpritesNotLoaded)
        ));
    }

    #[test]
    fn invalid_clip_keeps_previous_mask() {
        let mut canvas = Canvas::new(4, 4);
        canvas.clip(0, 0, 2, 2).unwrap();
        assert!(canvas.clip(3, 0, 1, 1).is_err());
        assert_eq!(canvas.clip_mask(), ClipMask::from_corners(0, 0, 2, 2).unwrap());
        canvas.reset_clip();
        canvas.clear(WHITE);
        assert!(canvas.raw().iter().all(|&b| b == 255));
    }

    #[test]
    fn config_with_in_memory_sprites() {
        let config = CanvasConfig::from_json_str(
            r#"{ "width": 8, "height": 4, "sprite_size": 1, "sprites": { "char_a": 1 } }"#,
        )
        .unwrap();
        let tilemap = vec![0, 0, 0, 255, 9, 9, 9, 255, 0, 0, 0, 255, 0, 0, 0, 255];
        let mut canvas = Canvas::from_config(&config, Some(tilemap)).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (8, 4));
        canvas.print("a a", 0, 0, &TextOptions::default()).unwrap();
        assert_eq!(canvas.pixel(0, 0), Some([9, 9, 9, 255]));
        assert_eq!(canvas.pixel(1, 0), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(2, 0), Some([9, 9, 9, 255]));
    }

    #[test]
    fn config_without_any_sprites_is_an_error() {
        let config = CanvasConfig::from_json_str(r#"{ "sprite_size": 8 }"#).unwrap();
        assert!(matches!(Canvas::from_config(&config, None), Err(CanvasError::Config(_))));
    }
}
