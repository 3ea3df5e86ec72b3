//! Retro-style software canvas.
//!
//! A CPU-side RGBA8 framebuffer with an optional rectangular clip mask, primitive
//! drawing (points, lines, circles, rectangles, triangles), sprite blits from a
//! tilemap, tile-font text, and export to image files or a printer.
//!
//! ```no_run
//! use pixel_canvas::{Canvas, palette};
//!
//! let mut canvas = Canvas::new(64, 64);
//! canvas.clear(palette::WHITE);
//! canvas.circle_fill(32, 32, 10, palette::RED);
//! canvas.write_image("out.png")?;
//! # Ok::<(), pixel_canvas::CanvasError>(())
//! ```

pub mod batch;
pub mod canvas;
pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod palette;
pub mod sprite;
pub mod text;
pub mod types;
#[cfg(feature = "window")]
pub mod window;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use error::{CanvasError, CanvasResult};
pub use export::{PrintSpooler, SystemSpooler};
pub use sprite::{SpriteOptions, SpriteSource};
pub use text::TextOptions;
pub use types::{ClipMask, Color, PixelBuffer, Rect, Vec2};
#[cfg(feature = "window")]
pub use window::Presenter;
