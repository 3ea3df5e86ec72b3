// Text drawn with glyph tiles from the sprite source.
// Characters map to glyph keys ("char_a"), glyph keys map to tile numbers through
// the sprite index table, and each glyph is blitted one tile-cell apart.

use crate::error::{CanvasError, CanvasResult};
use crate::palette::{BLACK, WHITE};
use crate::sprite::{self, SpriteOptions, SpriteSource};
use crate::types::{ClipMask, Color, PixelBuffer};

/// How text is drawn. Defaults: white, 1x scale, no invert, black chroma key on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextOptions {
    pub color: Color,
    pub scale_w: u8,
    pub scale_h: u8,
    pub invert: bool,
    pub mask: bool,
    pub mask_color: Color,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self { color: WHITE, scale_w: 1, scale_h: 1, invert: false, mask: true, mask_color: BLACK }
    }
}

impl TextOptions {
    fn sprite_options(&self) -> SpriteOptions {
        SpriteOptions {
            color: self.color,
            scale_w: self.scale_w,
            scale_h: self.scale_h,
            invert: self.invert,
            mask: self.mask,
            mask_color: self.mask_color,
            ..SpriteOptions::default()
        }
    }
}

/// Glyph key for a printable character; `None` if the font has no glyph for it.
pub fn glyph_key(c: char) -> Option<&'static str> {
    let key = match c {
        'a' => "char_a",
        'b' => "char_b",
        'c' => "char_c",
        'd' => "char_d",
        'e' => "char_e",
        'f' => "char_f",
        'g' => "char_g",
        'h' => "char_h",
        'i' => "char_i",
        'j' => "char_j",
        'k' => "char_k",
        'l' => "char_l",
        'm' => "char_m",
        'n' => "char_n",
        'o' => "char_o",
        'p' => "char_p",
        'q' => "char_q",
        'r' => "char_r",
        's' => "char_s",
        't' => "char_t",
        'u' => "char_u",
        'v' => "char_v",
        'w' => "char_w",
        'x' => "char_x",
        'y' => "char_y",
        'z' => "char_z",
        '0' => "char_0",
        '1' => "char_1",
        '2' => "char_2",
        '3' => "char_3",
        '4' => "char_4",
        '5' => "char_5",
        '6' => "char_6",
        '7' => "char_7",
        '8' => "char_8",
        '9' => "char_9",
        '!' => "char_exclamation",
        '"' => "char_doublequote",
        '\'' => "char_quote",
        '#' => "char_hash",
        '$' => "char_dollar",
        '`' => "char_backtick",
        '(' => "char_open_parenthesis",
        ')' => "char_close_parenthesis",
        '*' => "char_asterisk",
        '+' => "char_plus",
        ',' => "char_comma",
        '-' => "char_minus",
        '.' => "char_dot",
        '/' => "char_slash",
        ':' => "char_colon",
        ';' => "char_semicolon",
        '<' => "char_less_than",
        '=' => "char_equals",
        '>' => "char_greater_than",
        '?' => "char_question_mark",
        '@' => "char_at",
        '[' => "char_open_square_bracket",
        '\\' => "char_backslash",
        ']' => "char_close_square_bracket",
        '{' => "char_open_curly_brace",
        '|' => "char_pipe",
        '}' => "char_close_curly_brace",
        '~' => "char_tilde",
        _ => return None,
    };
    Some(key)
}

enum Step {
    Advance,
    Newline,
    Glyph(u32),
}

/// Resolve every character before drawing, so a bad string leaves the canvas untouched.
fn layout(sprites: &SpriteSource, text: &str) -> CanvasResult<Vec<Step>> {
    text.chars()
        .map(|c| match c {
            ' ' => Ok(Step::Advance),
            '\n' => Ok(Step::Newline),
            c => {
                let key = glyph_key(c).ok_or(CanvasError::MissingGlyph(c))?;
                let tile = sprites
                    .index_of(key)
                    .ok_or_else(|| CanvasError::MissingSpriteIndex(key.to_string()))?;
                Ok(Step::Glyph(tile))
            }
        })
        .collect()
}

/// Draw `text` with its top-left corner at (x,y).
/// Visual: one glyph per tile cell; spaces leave a gap, '\n' starts a new line under the first.
pub fn print(
    fb: &mut PixelBuffer,
    clip: &ClipMask,
    sprites: &SpriteSource,
    text: &str,
    x: i32,
    y: i32,
    opts: &TextOptions,
) -> CanvasResult<()> {
    let steps = layout(sprites, text)?;
    let advance_x = sprites.tile_size() * opts.scale_w as i32;
    let advance_y = sprites.tile_size() * opts.scale_h as i32;
    let glyph_opts = opts.sprite_options();

    let (mut cx, mut cy) = (x, y);
    for step in steps {
        match step {
            Step::Advance => cx += advance_x,
            Step::Newline => {
                cy += advance_y;
                cx = x;
            }
            Step::Glyph(tile) => {
                sprite::blit(fb, clip, sprites, tile, cx, cy, &glyph_opts);
                cx += advance_x;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::clear;

    /// 2x2 tilemap of 1px tiles: 0 black, 1 red, 2 green, 3 blue.
    fn font() -> SpriteSource {
        let bytes = vec![
            0, 0, 0, 255, 255, 0, 0, 255, //
            0, 255, 0, 255, 0, 0, 255, 255,
        ];
        SpriteSource::from_rgba(bytes, 1)
            .unwrap()
            .with_indices([("char_a", 1), ("char_b", 2), ("char_dot", 3), ("char_0", 0)])
    }

    fn blank(w: i32, h: i32) -> PixelBuffer {
        let mut fb = PixelBuffer::new(w, h);
        clear(&mut fb, &ClipMask::Unclipped, Color::rgb(1.0, 1.0, 1.0));
        fb
    }

    const W: [u8; 4] = [255; 4];

    #[test]
    fn glyph_table_covers_letters_digits_punctuation() {
        assert_eq!(glyph_key('q'), Some("char_q"));
        assert_eq!(glyph_key('7'), Some("char_7"));
        assert_eq!(glyph_key('\\'), Some("char_backslash"));
        assert_eq!(glyph_key('A'), None);
        assert_eq!(glyph_key('é'), None);
    }

    #[test]
    fn print_lays_out_spaces_and_newlines() {
        let mut fb = blank(4, 3);
        print(&mut fb, &ClipMask::Unclipped, &font(), "a b\n.a", 0, 0, &TextOptions::default()).unwrap();
        assert_eq!(fb.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(1, 0), Some(W));
        assert_eq!(fb.pixel(2, 0), Some([0, 255, 0, 255]));
        assert_eq!(fb.pixel(0, 1), Some([0, 0, 255, 255]));
        assert_eq!(fb.pixel(1, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn print_scales_the_cursor_advance() {
        let mut fb = blank(4, 4);
        let opts = TextOptions { scale_w: 2, scale_h: 2, ..Default::default() };
        print(&mut fb, &ClipMask::Unclipped, &font(), "ab", 0, 0, &opts).unwrap();
        assert_eq!(fb.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(2, 0), Some([0, 255, 0, 255]));
        assert_eq!(fb.pixel(3, 1), Some([0, 255, 0, 255]));
    }

    #[test]
    fn black_glyph_pixels_are_keyed_out_by_default() {
        let mut fb = blank(2, 1);
        print(&mut fb, &ClipMask::Unclipped, &font(), "0a", 0, 0, &TextOptions::default()).unwrap();
        assert_eq!(fb.pixel(0, 0), Some(W));
        assert_eq!(fb.pixel(1, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn unknown_character_is_an_error_and_draws_nothing() {
        let mut fb = blank(4, 1);
        let before = fb.clone();
        let err = print(&mut fb, &ClipMask::Unclipped, &font(), "aA", 0, 0, &TextOptions::default()).unwrap_err();
        assert!(matches!(err, CanvasError::MissingGlyph('A')));
        assert_eq!(fb, before);
    }

    #[test]
    fn glyph_without_index_is_an_error() {
        let mut fb = blank(4, 1);
        let err = print(&mut fb, &ClipMask::Unclipped, &font(), "z", 0, 0, &TextOptions::default()).unwrap_err();
        assert!(matches!(err, CanvasError::MissingSpriteIndex(key) if key == "char_z"));
    }
}
