// What you SEE:
// • A window showing the demo scene, animated once per frame. ESC quits.
// • --headless draws a single frame without a window.
// • --export writes the last frame to an image file; --printer sends it to a printer.

mod demo;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pixel_canvas::{Canvas, CanvasConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pixel-canvas", about = "Retro software canvas demo")]
struct Args {
    /// JSON canvas config (resolution, tilemap, sprite indices). Defaults to the built-in font.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the last frame to this image file (PNG).
    #[arg(long)]
    export: Option<PathBuf>,

    /// Send the last frame to this printer.
    #[arg(long)]
    printer: Option<String>,

    /// Draw one frame without opening a window.
    #[arg(long)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    /* --- Canvas setup ---
       Visual: nothing yet; the canvas starts opaque black. */
    let (mut canvas, render_scale) = match &args.config {
        Some(path) => {
            let config = CanvasConfig::load(path).with_context(|| format!("load {}", path.display()))?;
            (Canvas::from_config(&config, None)?, config.render_scale)
        }
        None => {
            let mut canvas = Canvas::new(160, 120);
            canvas.set_sprites(demo::font()?);
            (canvas, 4)
        }
    };

    if args.headless {
        demo::scene(&mut canvas, 0)?;
    } else {
        run_window(&mut canvas, render_scale)?;
    }

    if let Some(path) = &args.export {
        canvas.write_image(path).with_context(|| format!("export {}", path.display()))?;
    }

    // Printing is best effort: a missing spooler never fails the run.
    if let Some(printer) = &args.printer {
        if let Err(e) = canvas.send_to_printer(printer) {
            tracing::warn!(error = %e, "canvas not printed");
        }
    }

    Ok(())
}

#[cfg(feature = "window")]
fn run_window(canvas: &mut Canvas, render_scale: i32) -> anyhow::Result<()> {
    use std::time::{Duration, Instant};

    let mut presenter = pixel_canvas::Presenter::new("pixel-canvas", canvas.width(), canvas.height(), render_scale)?;

    let mut frame: u32 = 0;
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while presenter.is_open() && !presenter.esc_pressed() {
        demo::scene(canvas, frame)?;
        presenter.present(canvas.buffer())?; // visual: the window shows this frame
        frame = frame.wrapping_add(1);

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            tracing::debug!(fps, "frame rate");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_window(canvas: &mut Canvas, _render_scale: i32) -> anyhow::Result<()> {
    tracing::warn!("built without the `window` feature; drawing one frame");
    demo::scene(canvas, 0)?;
    Ok(())
}
