// Software drawing primitives on a PixelBuffer under a ClipMask.
// Every write goes through the bounds + clip test; when no clip is active,
// horizontal runs take the batched path in `batch`, with identical output.

use crate::batch;
use crate::types::{ClipMask, Color, PixelBuffer, Vec2};

/* ---------- Pixels ---------- */

/// Write raw bytes at (x,y) if inside the buffer and the clip mask.
#[inline]
pub(crate) fn put_rgba(fb: &mut PixelBuffer, clip: &ClipMask, x: i32, y: i32, rgba: [u8; 4]) {
    if !fb.in_bounds(x, y) || !clip.contains(x, y) {
        return;
    }
    fb.write(x, y, rgba);
}

/// Put a pixel on the buffer if (x,y) is inside bounds and the clip mask.
/// Visual: the exact pixel at (x,y) changes color.
pub fn pset(fb: &mut PixelBuffer, clip: &ClipMask, x: i32, y: i32, color: Color) {
    put_rgba(fb, clip, x, y, color.to_rgba8());
}

/// Fill the whole buffer, or only the clipped part of it.
pub fn clear(fb: &mut PixelBuffer, clip: &ClipMask, color: Color) {
    let rgba = color.to_rgba8();
    if !clip.is_clipped() {
        batch::fill(fb.raw_mut(), rgba);
        return;
    }

    // Irregular write pattern: test every pixel.
    let width = fb.width().max(1) as usize;
    for (i, px) in fb.raw_mut().chunks_exact_mut(4).enumerate() {
        let (x, y) = ((i % width) as i32, (i / width) as i32);
        if clip.contains(x, y) {
            px.copy_from_slice(&rgba);
        }
    }
}

/* ---------- Lines ---------- */

/// Draw a 1-pixel line between (x1,y1) and (x2,y2), endpoints included.
/// Stepping is done in 64 bits so endpoints far apart cannot overflow. The walk jumps
/// straight to the first major-axis step inside the buffer and stops once either
/// coordinate has moved past it; the lit pixels are the same as a full walk.
fn line_rgba(fb: &mut PixelBuffer, clip: &ClipMask, x1: i32, y1: i32, x2: i32, y2: i32, rgba: [u8; 4]) {
    let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
    let (w, h) = (fb.width() as i64, fb.height() as i64);
    let (mut x, mut y) = (x1, y1);
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let step_x = if x1 < x2 { 1 } else { -1 };
    let step_y = if y1 < y2 { 1 } else { -1 };
    let err0 = (if dx > dy { dx } else { -dy }) / 2;
    let mut err = err0;

    // Closed form of k steps: x-major lines keep err in [0,dx) and step x every
    // iteration, y-major lines keep err in (-dy,0] and step y every iteration.
    if dx > dy {
        let k = steps_to_enter(x1, step_x, w).min(dx);
        if k > 0 {
            // k * dy can exceed i64 for endpoints near the i32 limits.
            let m = ((k as i128 * dy as i128 - err0 as i128 + dx as i128 - 1).div_euclid(dx as i128)) as i64;
            x += step_x * k;
            y += step_y * m;
            err = (err0 as i128 - k as i128 * dy as i128 + m as i128 * dx as i128) as i64;
        }
    } else if dy > 0 {
        let k = steps_to_enter(y1, step_y, h).min(dy);
        if k > 0 {
            let m = ((err0 as i128 + k as i128 * dx as i128 + dy as i128 - 1).div_euclid(dy as i128)) as i64;
            y += step_y * k;
            x += step_x * m;
            err = (err0 as i128 + k as i128 * dx as i128 - m as i128 * dy as i128) as i64;
        }
    }

    loop {
        // Between the endpoints, so the casts are lossless.
        put_rgba(fb, clip, x as i32, y as i32, rgba);
        if x == x2 && y == y2 {
            break;
        }
        if passed(x, step_x, w) || passed(y, step_y, h) {
            break;
        }
        let e2 = err;
        if e2 > -dx {
            err -= dy;
            x += step_x;
        }
        if e2 < dy {
            err += dx;
            y += step_y;
        }
    }
}

/// Steps along one axis from `start` until the coordinate lies in `[0,size)`.
#[inline]
fn steps_to_enter(start: i64, step: i64, size: i64) -> i64 {
    if step > 0 { (-start).max(0) } else { (start - (size - 1)).max(0) }
}

/// True once a coordinate moving by `step` can never come back into `[0,size)`.
#[inline]
fn passed(v: i64, step: i64, size: i64) -> bool {
    if step > 0 { v >= size } else { v < 0 }
}

/// Draw a line between (x1,y1) and (x2,y2) using Bresenham stepping.
/// Visual: a straight 1-pixel line, both endpoints lit.
pub fn line(fb: &mut PixelBuffer, clip: &ClipMask, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
    line_rgba(fb, clip, x1, y1, x2, y2, color.to_rgba8());
}

/// Horizontal run from x0 to x1 (inclusive, any order) on row `y`, ignoring the clip mask.
/// Clamped to the buffer; rows outside the buffer are skipped.
pub fn hline_fast(fb: &mut PixelBuffer, x0: i32, y: i32, x1: i32, color: Color) {
    hline_fast_rgba(fb, x0, y, x1, color.to_rgba8());
}

fn hline_fast_rgba(fb: &mut PixelBuffer, x0: i32, y: i32, x1: i32, rgba: [u8; 4]) {
    if y < 0 || y >= fb.height() {
        return;
    }
    let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    let x0 = x0.max(0);
    let x1 = x1.min(fb.width() - 1);
    if x0 > x1 {
        return;
    }

    let start = fb.offset(x0, y);
    let end = fb.offset(x1, y) + 4;
    batch::fill(&mut fb.raw_mut()[start..end], rgba);
}

/// Horizontal span through whichever path the clip state allows.
#[inline]
fn span(fb: &mut PixelBuffer, clip: &ClipMask, x0: i32, y: i32, x1: i32, rgba: [u8; 4]) {
    if clip.is_clipped() {
        line_rgba(fb, clip, x0, y, x1, y, rgba);
    } else {
        hline_fast_rgba(fb, x0, y, x1, rgba);
    }
}

/* ---------- Circles ---------- */

/// Midpoint circle outline of radius `r` around (xc,yc). `r <= 0` draws nothing.
/// Visual: a closed 1-pixel ring with no gaps at the diagonals.
pub fn circle(fb: &mut PixelBuffer, clip: &ClipMask, xc: i32, yc: i32, r: i32, color: Color) {
    if r <= 0 {
        return;
    }
    let rgba = color.to_rgba8();
    let mut put = |x: i32, y: i32| put_rgba(fb, clip, x, y, rgba);

    let mut x = r;
    let mut y = 0;
    let mut p = 1 - r;

    while x >= y {
        put(xc + x, yc + y);
        put(xc - x, yc + y);
        put(xc + x, yc - y);
        put(xc - x, yc - y);
        put(xc + y, yc + x);
        put(xc - y, yc + x);
        put(xc + y, yc - x);
        put(xc - y, yc - x);

        y += 1;

        if p <= 0 {
            p += 2 * y + 1;
        } else {
            // seam points where the step would leave a hole
            if p + 2 * (y - x + 1) < 0 {
                put(xc + x, yc + y - 1);
                put(xc - x, yc + y - 1);
                put(xc + x, yc - y + 1);
                put(xc - x, yc - y + 1);
            }
            x -= 1;
            p += 2 * y - 2 * x + 1;
        }
    }
}

/// Filled disc: the same midpoint stepping as `circle`, drawn as horizontal spans.
pub fn circle_fill(fb: &mut PixelBuffer, clip: &ClipMask, xc: i32, yc: i32, r: i32, color: Color) {
    if r <= 0 {
        return;
    }
    let rgba = color.to_rgba8();

    let mut x = r;
    let mut y = 0;
    let mut p = 1 - r;

    while x >= y {
        span(fb, clip, xc - x, yc + y, xc + x, rgba);
        span(fb, clip, xc - x, yc - y, xc + x, rgba);
        span(fb, clip, xc - y, yc + x, xc + y, rgba);
        span(fb, clip, xc - y, yc - x, xc + y, rgba);

        y += 1;

        if p <= 0 {
            p += 2 * y + 1;
        } else {
            if p + 2 * (y - x + 1) < 0 {
                span(fb, clip, xc - x, yc + y - 1, xc + x, rgba);
                span(fb, clip, xc - x, yc - y + 1, xc + x, rgba);
            }
            x -= 1;
            p += 2 * y - 2 * x + 1;
        }
    }
}

/* ---------- Rectangles ---------- */

/// Outline through the four corners (both corners inclusive).
pub fn rectangle(fb: &mut PixelBuffer, clip: &ClipMask, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
    let rgba = color.to_rgba8();
    line_rgba(fb, clip, x1, y1, x2, y1, rgba);
    line_rgba(fb, clip, x2, y1, x2, y2, rgba);
    line_rgba(fb, clip, x2, y2, x1, y2, rgba);
    line_rgba(fb, clip, x1, y2, x1, y1, rgba);
}

/// Fill `[min_x,max_x) x [min_y,max_y)`; the corners may come in any order.
pub fn rectangle_fill(fb: &mut PixelBuffer, clip: &ClipMask, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
    let rgba = color.to_rgba8();
    let (min_x, max_x) = (x1.min(x2), x1.max(x2));
    let (min_y, max_y) = (y1.min(y2), y1.max(y2));
    if min_x == max_x {
        return;
    }

    if !clip.is_clipped() {
        for y in min_y..max_y {
            hline_fast_rgba(fb, min_x, y, max_x - 1, rgba);
        }
        return;
    }

    for y in min_y..max_y {
        for x in min_x..max_x {
            put_rgba(fb, clip, x, y, rgba);
        }
    }
}

/* ---------- Triangles ---------- */

/// Fill the triangle (v0,v1,v2). Either winding gives the same pixels.
/// Samples sit on integer coordinates; a sample on an edge is inside.
pub fn triangle_fill(fb: &mut PixelBuffer, clip: &ClipMask, v0: Vec2, v1: Vec2, v2: Vec2, color: Color) {
    let rgba = color.to_rgba8();

    // Normalize winding so "inside" means all edge functions >= 0.
    let signed_area = (v0.x - v2.x) * (v1.y - v2.y) - (v1.x - v2.x) * (v0.y - v2.y);
    let tri = if signed_area > 0.0 { [v0, v2, v1] } else { [v0, v1, v2] };

    let min_x = v0.x.min(v1.x).min(v2.x) as i32;
    let min_y = v0.y.min(v1.y).min(v2.y) as i32;
    let max_x = v0.x.max(v1.x).max(v2.x) as i32;
    let max_y = v0.y.max(v1.y).max(v2.y) as i32;

    // Samples outside the buffer can never be written.
    let min_x = min_x.max(0);
    let min_y = min_y.max(0);
    let max_x = max_x.min(fb.width() - 1);
    let max_y = max_y.min(fb.height() - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let [a, b, c] = tri;
    for y in min_y..=max_y {
        let mut x = min_x;

        while x <= max_x - batch::LANES as i32 {
            let mask = batch::inside_lanes(&tri, x, y);
            for i in 0..batch::LANES as i32 {
                if mask & (1 << i) != 0 {
                    put_rgba(fb, clip, x + i, y, rgba);
                }
            }
            x += batch::LANES as i32;
        }

        while x <= max_x {
            let (px, py) = (x as f32, y as f32);
            let w0 = batch::edge(b, c, px, py);
            let w1 = batch::edge(c, a, px, py);
            let w2 = batch::edge(a, b, px, py);
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                put_rgba(fb, clip, x, y, rgba);
            }
            x += 1;
        }
    }
}
