// Built-in demo assets and scene.
// The font is a 5x7 bitmap set baked into an 8x8-tile tilemap at startup, so the
// demo runs without any files on disk.

use pixel_canvas::palette::pico8;
use pixel_canvas::text::glyph_key;
use pixel_canvas::{Canvas, CanvasResult, SpriteOptions, SpriteSource, TextOptions};

const TILE: usize = 8;
const SHEET: usize = 128; // tilemap edge in pixels (16 x 16 tiles)

/// 5x7 glyphs: each u8 is a row, the low 5 bits are the pixels (bit 4 = leftmost).
const GLYPHS: &[(char, [u8; 7])] = &[
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    ('a', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('b', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('c', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('d', [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
    ('e', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('f', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('g', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('h', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('i', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('j', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('k', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('l', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('m', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('n', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('o', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('p', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('r', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('s', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('t', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('u', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('v', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('w', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    ('x', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('y', [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
    ('|', [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    (':', [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('!', [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100]),
    ('?', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100]),
];

/// White glyphs on black tiles (black is the default chroma key), one glyph per tile.
pub fn font() -> CanvasResult<SpriteSource> {
    let mut sheet = [0u8, 0, 0, 255].repeat(SHEET * SHEET);
    let per_row = SHEET / TILE;

    for (n, (_, rows)) in GLYPHS.iter().enumerate() {
        let (tx, ty) = ((n % per_row) * TILE, (n / per_row) * TILE);
        for (ry, bits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if bits & (1 << (4 - rx)) != 0 {
                    // one column of padding on the left of each cell
                    let i = ((ty + ry) * SHEET + tx + rx + 1) * 4;
                    sheet[i..i + 3].fill(255);
                }
            }
        }
    }

    let indices = GLYPHS
        .iter()
        .enumerate()
        .filter_map(|(n, (c, _))| glyph_key(*c).map(|key| (key, n as u32)));
    Ok(SpriteSource::from_rgba(sheet, TILE as i32)?.with_indices(indices))
}

/// Draw frame `frame` of the demo scene.
pub fn scene(canvas: &mut Canvas, frame: u32) -> CanvasResult<()> {
    let (w, h) = (canvas.width(), canvas.height());
    let t = frame as i32;

    canvas.reset_clip();
    canvas.clear(pico8::DARK_BLUE);

    // Ground + sun + mountain.
    canvas.rectangle_fill(0, h * 3 / 4, w, h, pico8::DARK_GREEN);
    canvas.circle_fill(w - 28, 28, 14 + (t / 4) % 4, pico8::ORANGE);
    canvas.circle(w - 28, 28, 20, pico8::YELLOW);
    canvas.triangle_fill((20, h * 3 / 4), (60, h / 3), (100, h * 3 / 4), pico8::INDIGO);
    canvas.line(0, h * 3 / 4, w - 1, h * 3 / 4, pico8::GREEN);
    canvas.rectangle(2, 2, w - 3, h - 3, pico8::LIGHT_GRAY);

    // A clipped disc: only the left half of it survives.
    let (cx, cy) = (40 + (t % 80), h - 16);
    let top = h * 3 / 4 + 1;
    canvas.clip(0, top, cx.max(0), (h - 3).max(top))?;
    canvas.circle_fill(cx, cy, 10, pico8::PINK);
    canvas.reset_clip();

    // Glyph tiles used as sprites: flipped, scaled, inverted.
    let big = SpriteOptions { color: pico8::PEACH, scale_w: 2, scale_h: 2, ..Default::default() };
    canvas.sprite_named("char_a", 8, 8, &big)?;
    let flipped = SpriteOptions { flip_x: true, flip_y: true, ..big };
    canvas.sprite_named("char_a", 26, 8, &flipped)?;
    let inverted = SpriteOptions { invert: true, mask: false, ..Default::default() };
    canvas.sprite_named("char_p", 46, 12, &inverted)?;

    let title = TextOptions { color: pico8::WHITE, ..Default::default() };
    canvas.print("pixel canvas", 8, 28, &title)?;
    let info = TextOptions { color: pico8::YELLOW, ..Default::default() };
    canvas.print(&format!("frame {frame}\n{w}x{h}"), 8, 40, &info)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_registers_every_glyph() {
        let font = font().unwrap();
        for (n, (c, _)) in GLYPHS.iter().enumerate() {
            let key = glyph_key(*c).unwrap();
            assert_eq!(font.index_of(key), Some(n as u32), "{c:?}");
        }
    }

    #[test]
    fn scene_draws_every_frame_kind() {
        let mut canvas = Canvas::new(160, 120);
        canvas.set_sprites(font().unwrap());
        for frame in [0, 1, 79, 80, 1000] {
            scene(&mut canvas, frame).unwrap();
        }
        assert_eq!(canvas.clip_mask(), pixel_canvas::ClipMask::Unclipped);
    }
}
