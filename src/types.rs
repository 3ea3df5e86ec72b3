// Core types used by every drawing path: color, the RGBA8 pixel buffer, the clip mask.

use crate::error::{CanvasError, CanvasResult};

/// RGBA color with each channel in `[0,1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Stored byte for one channel. Truncates, never rounds: `0.999 -> 254`.
    #[inline]
    pub fn channel_byte(c: f32) -> u8 {
        (c * 255.0) as u8
    }

    /// The four bytes written into the buffer for this color.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            Self::channel_byte(self.r),
            Self::channel_byte(self.g),
            Self::channel_byte(self.b),
            Self::channel_byte(self.a),
        ]
    }

    /// RGB bytes only; used as the chroma key for masked blits.
    #[inline]
    pub fn to_rgb8(self) -> [u8; 3] {
        let [r, g, b, _] = self.to_rgba8();
        [r, g, b]
    }
}

/// 2D point with float coordinates (triangle vertices).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Vec2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x: x as f32, y: y as f32 }
    }
}

/// Integer rectangle: `origin` inclusive, `origin + size` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// Gates which pixels a draw call may touch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClipMask {
    /// Every in-bounds pixel may be written.
    #[default]
    Unclipped,
    /// Only pixels inside the rectangle may be written.
    Clipped(Rect),
}

impl ClipMask {
    /// Clip to `[x1,x2) x [y1,y2)`. Inverted corners are rejected.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> CanvasResult<Self> {
        // Inverted corners, or a size that does not fit an i32.
        match (x2.checked_sub(x1), y2.checked_sub(y1)) {
            (Some(w), Some(h)) if w >= 0 && h >= 0 => Ok(Self::Clipped(Rect { x: x1, y: y1, w, h })),
            _ => Err(CanvasError::InvalidClip { x1, y1, x2, y2 }),
        }
    }

    /// True if a write at (x,y) is allowed by the mask.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        match self {
            Self::Unclipped => true,
            Self::Clipped(rect) => rect.contains(x, y),
        }
    }

    #[inline]
    pub fn is_clipped(&self) -> bool {
        matches!(self, Self::Clipped(_))
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Unclipped => None,
            Self::Clipped(rect) => Some(*rect),
        }
    }
}

/// Contiguous RGBA8 pixels, row-major, top-left origin.
/// Invariant: `pixels.len() == width * height * 4`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelBuffer {
    width: i32,  // pixels per row
    height: i32, // rows
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zero-filled (transparent black) buffer.
    pub fn new(width: i32, height: i32) -> Self {
        let mut buffer = Self::default();
        buffer.resize(width, height);
        buffer
    }

    /// Reallocate storage for the new size; contents are zeroed.
    /// Negative dimensions are treated as 0.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.pixels.clear();
        self.pixels.resize(self.width as usize * self.height as usize * 4, 0);
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The raw RGBA8 bytes, for presentation or export.
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Byte offset of (x,y). Caller guarantees the coordinate is in bounds.
    #[inline]
    pub(crate) fn offset(&self, x: i32, y: i32) -> usize {
        4 * (y as usize * self.width as usize + x as usize)
    }

    /// Read back one pixel, `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let i = self.offset(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Some(px)
    }

    /// Overwrite one pixel. Caller guarantees the coordinate is in bounds.
    #[inline]
    pub(crate) fn write(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }
}
