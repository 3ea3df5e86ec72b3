// Named colors and the PICO-8 palette.

use crate::types::Color;

pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

/// Colors based on the PICO-8 palette.
pub mod pico8 {
    use crate::types::Color;

    const fn c(r: u8, g: u8, b: u8) -> Color {
        Color::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const BLACK: Color = c(0, 0, 0);
    pub const DARK_BLUE: Color = c(29, 43, 83);
    pub const DARK_PURPLE: Color = c(126, 43, 83);
    pub const DARK_GREEN: Color = c(0, 135, 81);
    pub const BROWN: Color = c(171, 82, 54);
    pub const DARK_GRAY: Color = c(95, 87, 79);
    pub const LIGHT_GRAY: Color = c(194, 195, 199);
    pub const WHITE: Color = c(255, 241, 232);
    pub const RED: Color = c(255, 0, 77);
    pub const ORANGE: Color = c(255, 163, 0);
    pub const YELLOW: Color = c(255, 236, 39);
    pub const GREEN: Color = c(0, 228, 54);
    pub const BLUE: Color = c(41, 173, 255);
    pub const INDIGO: Color = c(131, 118, 156);
    pub const PINK: Color = c(255, 119, 168);
    pub const PEACH: Color = c(255, 204, 170);

    /// All 16 entries in palette order.
    pub const ALL: [Color; 16] = [
        BLACK, DARK_BLUE, DARK_PURPLE, DARK_GREEN, BROWN, DARK_GRAY, LIGHT_GRAY, WHITE, RED,
        ORANGE, YELLOW, GREEN, BLUE, INDIGO, PINK, PEACH,
    ];
}

/// Relative luminance with a 2.2 gamma approximation.
pub fn luminance(color: Color) -> f32 {
    0.2126 * color.r.powf(2.2) + 0.7152 * color.g.powf(2.2) + 0.0722 * color.b.powf(2.2)
}
