// Batched pixel writes for the unclipped fast paths.
// A color is packed into one 32-bit RGBA word and replicated four times; runs are
// stored 16 bytes (four pixels) at a time with a scalar tail. Results are byte-for-byte
// the same as writing each pixel individually.

use crate::types::Vec2;

/// Pixels per batched store.
pub const LANES: usize = 4;

const STRIDE: usize = LANES * 4;

/// Pack RGBA bytes into one word: `(a << 24) | (b << 16) | (g << 8) | r`.
#[inline]
pub fn pack(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

/// Four copies of the packed color, laid out as 16 bytes.
#[inline]
fn splat(rgba: [u8; 4]) -> [u8; STRIDE] {
    let word = u128::from(pack(rgba));
    (word | word << 32 | word << 64 | word << 96).to_le_bytes()
}

/// Fill a run of whole pixels with one color.
pub fn fill(bytes: &mut [u8], rgba: [u8; 4]) {
    debug_assert_eq!(bytes.len() % 4, 0);
    let wide = splat(rgba);

    let mut chunks = bytes.chunks_exact_mut(STRIDE);
    for chunk in &mut chunks {
        chunk.copy_from_slice(&wide);
    }
    // remaining pixels
    for px in chunks.into_remainder().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// Edge function of the directed edge `a -> b` at sample (px, py).
#[inline]
pub fn edge(a: Vec2, b: Vec2, px: f32, py: f32) -> f32 {
    (px - a.x) * (b.y - a.y) - (py - a.y) * (b.x - a.x)
}

#[inline]
fn edge_lanes(a: Vec2, b: Vec2, px: [f32; LANES], py: f32) -> [f32; LANES] {
    let dy = b.y - a.y;
    let dx = b.x - a.x;
    let ry = (py - a.y) * dx;
    px.map(|x| (x - a.x) * dy - ry)
}

/// Evaluate the three edge functions for x-samples `x..x+4` on row `y`.
/// Bit `i` of the result is set when sample `x+i` is inside (all edges `>= 0`).
pub fn inside_lanes(tri: &[Vec2; 3], x: i32, y: i32) -> u8 {
    let [v0, v1, v2] = *tri;
    let px: [f32; LANES] = std::array::from_fn(|i| (x + i as i32) as f32);
    let py = y as f32;

    let w0 = edge_lanes(v1, v2, px, py);
    let w1 = edge_lanes(v2, v0, px, py);
    let w2 = edge_lanes(v0, v1, px, py);

    let mut mask = 0u8;
    for i in 0..LANES {
        if w0[i] >= 0.0 && w1[i] >= 0.0 && w2[i] >= 0.0 {
            mask |= 1 << i;
        }
    }
    mask
}
