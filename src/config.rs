// Canvas settings: resolution, sprite tile size, tilemap file and the sprite index table.
//
// {
//   "width": 160, "height": 120, "render_scale": 4,
//   "sprite_size": 8,
//   "sprites_filename": "assets/font.png",
//   "sprites": { "char_a": 16, "char_b": 17 }
// }

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CanvasError, CanvasResult};

fn default_width() -> i32 {
    128
}

fn default_height() -> i32 {
    128
}

fn default_render_scale() -> i32 {
    1
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    /// Window pixels per canvas pixel.
    #[serde(default = "default_render_scale")]
    pub render_scale: i32,
    /// Square tile edge in the tilemap, in pixels.
    pub sprite_size: i32,
    /// Tilemap image; may be omitted when the tilemap is supplied in memory.
    #[serde(default)]
    pub sprites_filename: Option<PathBuf>,
    /// Name -> tile index.
    #[serde(default)]
    pub sprites: BTreeMap<String, i64>,
}

impl CanvasConfig {
    pub fn from_json_str(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> CanvasResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> CanvasResult<()> {
        if self.sprite_size <= 0 {
            return Err(CanvasError::Config(format!("sprite_size must be positive, got {}", self.sprite_size)));
        }
        if self.width < 0 || self.height < 0 {
            return Err(CanvasError::Config(format!("negative resolution {}x{}", self.width, self.height)));
        }
        if self.render_scale <= 0 {
            return Err(CanvasError::Config(format!("render_scale must be positive, got {}", self.render_scale)));
        }
        Ok(())
    }

    /// Index table entries that fit a tile number; the rest are skipped with a warning.
    pub fn sprite_indices(&self) -> impl Iterator<Item = (String, u32)> + '_ {
        self.sprites.iter().filter_map(|(name, &value)| match u32::try_from(value) {
            Ok(tile) => Some((name.clone(), tile)),
            Err(_) => {
                tracing::warn!(name = %name, value, "sprite index out of range, skipped");
                None
            }
        })
    }
}
