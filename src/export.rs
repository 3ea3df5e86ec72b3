// Getting pixels out of the canvas: image files and the OS print spooler.
// Both honor the clip mask: with a clip set, only that rectangle is exported.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::{CanvasError, CanvasResult};
use crate::types::{ClipMask, PixelBuffer, Rect};

/// Copy the exported region into a fresh image: the whole buffer when unclipped,
/// exactly the clip rectangle otherwise. Parts of the clip outside the buffer stay
/// transparent black.
pub fn region(fb: &PixelBuffer, clip: &ClipMask) -> CanvasResult<RgbaImage> {
    let rect = clip.rect().unwrap_or(Rect { x: 0, y: 0, w: fb.width(), h: fb.height() });
    let (w, h) = (rect.w as usize, rect.h as usize);
    let len = w.checked_mul(h).and_then(|n| n.checked_mul(4)).ok_or(CanvasError::Allocation(usize::MAX))?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| CanvasError::Allocation(len))?;
    data.resize(len, 0);

    // Columns of the clip that overlap the buffer.
    let x0 = rect.x.max(0);
    let x1 = (rect.x + rect.w).min(fb.width());
    if x0 < x1 {
        let run = (x1 - x0) as usize * 4;
        let dst_x = (x0 - rect.x) as usize * 4;
        for row in 0..rect.h {
            let sy = rect.y + row;
            if sy < 0 || sy >= fb.height() {
                continue;
            }
            let src = fb.offset(x0, sy);
            let dst = row as usize * w * 4 + dst_x;
            data[dst..dst + run].copy_from_slice(&fb.raw()[src..src + run]);
        }
    }

    RgbaImage::from_raw(rect.w as u32, rect.h as u32, data)
        .ok_or(CanvasError::Allocation(len))
}

/// Write the exported region to `path`; the format follows the extension (PNG expected).
#[tracing::instrument(skip(fb))]
pub fn write_image(fb: &PixelBuffer, clip: &ClipMask, path: &Path) -> CanvasResult<()> {
    let image = region(fb, clip)?;
    image.save(path)?;
    tracing::info!(width = image.width(), height = image.height(), "wrote image");
    Ok(())
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> CanvasResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Anything that can take a page and hand it to a printer.
pub trait PrintSpooler {
    fn submit(&self, printer: &str, page: &RgbaImage) -> CanvasResult<()>;
}

/// The host's spooler: `lp -d <printer>` fed a PNG on stdin (Unix only).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemSpooler;

impl PrintSpooler for SystemSpooler {
    #[cfg(unix)]
    fn submit(&self, printer: &str, page: &RgbaImage) -> CanvasResult<()> {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let png = encode_png(page)?;
        let mut child = match Command::new("lp")
            .arg("-d")
            .arg(printer)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CanvasError::PrintUnsupported("no `lp` spooler on this host".into()));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png)?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CanvasError::Print(format!("{printer}: {}", stderr.trim())));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn submit(&self, _printer: &str, _page: &RgbaImage) -> CanvasResult<()> {
        Err(CanvasError::PrintUnsupported(std::env::consts::OS.to_string()))
    }
}

/// Send the exported region to `printer`. Failures are logged and returned;
/// the canvas is never modified.
#[tracing::instrument(skip(fb, spooler))]
pub fn send_to_printer(
    fb: &PixelBuffer,
    clip: &ClipMask,
    printer: &str,
    spooler: &dyn PrintSpooler,
) -> CanvasResult<()> {
    let page = region(fb, clip)?;
    spooler
        .submit(printer, &page)
        .inspect_err(|e| tracing::error!(error = %e, "print failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn numbered(w: i32, h: i32) -> PixelBuffer {
        let mut fb = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                fb.write(x, y, [x as u8, y as u8, 7, 255]);
            }
        }
        fb
    }

    #[test]
    fn unclipped_region_is_whole_buffer() {
        let fb = numbered(5, 3);
        let image = region(&fb, &ClipMask::Unclipped).unwrap();
        assert_eq!(image.dimensions(), (5, 3));
        assert_eq!(image.as_raw().as_slice(), fb.raw());
    }

    #[test]
    fn clipped_region_copies_rows() {
        let fb = numbered(6, 5);
        let clip = ClipMask::from_corners(2, 1, 5, 3).unwrap();
        let image = region(&fb, &clip).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0).0, [2, 1, 7, 255]);
        assert_eq!(image.get_pixel(2, 1).0, [4, 2, 7, 255]);
    }

    #[test]
    fn clip_beyond_buffer_pads_with_transparent() {
        let fb = numbered(3, 3);
        let clip = ClipMask::from_corners(-1, 2, 2, 4).unwrap();
        let image = region(&fb, &clip).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 2, 7, 255]);
        assert_eq!(image.get_pixel(2, 0).0, [1, 2, 7, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[derive(Default)]
    struct Recorder {
        jobs: RefCell<Vec<(String, u32, u32)>>,
    }

    impl PrintSpooler for Recorder {
        fn submit(&self, printer: &str, page: &RgbaImage) -> CanvasResult<()> {
            self.jobs.borrow_mut().push((printer.to_string(), page.width(), page.height()));
            Ok(())
        }
    }

    struct Offline;

    impl PrintSpooler for Offline {
        fn submit(&self, _printer: &str, _page: &RgbaImage) -> CanvasResult<()> {
            Err(CanvasError::PrintUnsupported("test".into()))
        }
    }

    #[test]
    fn printer_receives_clipped_page() {
        let fb = numbered(8, 8);
        let clip = ClipMask::from_corners(0, 0, 4, 2).unwrap();
        let spooler = Recorder::default();
        send_to_printer(&fb, &clip, "desk", &spooler).unwrap();
        assert_eq!(spooler.jobs.borrow().as_slice(), &[("desk".to_string(), 4, 2)]);
    }

    #[test]
    fn missing_spooler_is_recoverable() {
        let fb = numbered(2, 2);
        let before = fb.clone();
        let err = send_to_printer(&fb, &ClipMask::Unclipped, "desk", &Offline).unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(fb, before);
    }

    #[test]
    fn png_bytes_decode_back() {
        let fb = numbered(4, 4);
        let image = region(&fb, &ClipMask::Unclipped).unwrap();
        let decoded = image::load_from_memory(&encode_png(&image).unwrap()).unwrap().into_rgba8();
        assert_eq!(decoded, image);
    }
}
