// Window that shows the canvas.
// Each frame the RGBA8 buffer is converted to minifb's 0x00RRGGBB words,
// blown up by the render scale, and pushed to the screen in one update.

use minifb::{Key, Window, WindowOptions};

use crate::error::{CanvasError, CanvasResult};
use crate::types::PixelBuffer;

pub struct Presenter {
    window: Window,  // the on-screen window you see
    frame: Vec<u32>, // scaled copy of the canvas in minifb's format
    scale: usize,
}

impl Presenter {
    /// Open a window `scale` times the size of a `width` x `height` canvas.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: i32, height: i32, scale: i32) -> CanvasResult<Self> {
        let scale = scale.max(1) as usize;
        let (w, h) = (width.max(0) as usize * scale, height.max(0) as usize * scale);
        let mut window = Window::new(title, w, h, WindowOptions::default())
            .map_err(|e| CanvasError::Window(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, frame: vec![0; w * h], scale })
    }

    /// Push this frame's pixels to the screen.
    /// Visual: the window immediately displays the canvas.
    pub fn present(&mut self, canvas: &PixelBuffer) -> CanvasResult<()> {
        upscale_into(canvas, self.scale, &mut self.frame);
        let w = canvas.width() as usize * self.scale;
        let h = canvas.height() as usize * self.scale;
        self.window
            .update_with_buffer(&self.frame, w, h)
            .map_err(|e| CanvasError::Window(e.to_string()))
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }
}

/// RGBA bytes -> 0x00RRGGBB; alpha is dropped.
#[inline]
fn to_0rgb(px: &[u8]) -> u32 {
    (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32
}

/// Nearest-neighbor upscale of the whole canvas into `frame`.
fn upscale_into(canvas: &PixelBuffer, scale: usize, frame: &mut Vec<u32>) {
    let (w, h) = (canvas.width() as usize, canvas.height() as usize);
    let out_w = w * scale;
    frame.clear();
    frame.resize(out_w * h * scale, 0);
    if w == 0 {
        return;
    }

    for (y, row) in canvas.raw().chunks_exact(w * 4).enumerate() {
        let first = y * scale * out_w;
        let line = &mut frame[first..first + out_w];
        for (x, px) in row.chunks_exact(4).enumerate() {
            line[x * scale..(x + 1) * scale].fill(to_0rgb(px));
        }
        // repeat the finished line for the remaining scaled rows
        for k in 1..scale {
            frame.copy_within(first..first + out_w, first + k * out_w);
        }
    }
}
