// One error type for the whole canvas. Every variant states *where* things went wrong.
// Out-of-bounds and out-of-clip writes are not errors; they are silently skipped.

/// Convenience result type used across the canvas.
pub type CanvasResult<T> = Result<T, CanvasError>;

#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    /// A blit or print was attempted before any sprite source was attached.
    #[error("sprite source not loaded")]
    SpritesNotLoaded,

    /// The character has no glyph key in the text table.
    #[error("no glyph key for character {0:?}")]
    MissingGlyph(char),

    /// The glyph key (or sprite name) has no entry in the sprite index table.
    #[error("missing sprite index for {0}")]
    MissingSpriteIndex(String),

    /// An in-memory or decoded tilemap violates the tilemap rules.
    #[error("malformed sprite source: {0}")]
    MalformedSprites(String),

    /// `clip(x1,y1,x2,y2)` with `x2 < x1` or `y2 < y1`.
    #[error("invalid clip rectangle ({x1},{y1})-({x2},{y2})")]
    InvalidClip { x1: i32, y1: i32, x2: i32, y2: i32 },

    /// Missing or invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// The export region buffer could not be allocated.
    #[error("could not allocate {0} bytes for export")]
    Allocation(usize),

    /// No print spooler is available on this platform or host.
    #[error("printing not supported: {0}")]
    PrintUnsupported(String),

    /// The spooler rejected the job.
    #[error("print failed: {0}")]
    Print(String),

    /// Creating or updating the presentation window failed.
    #[error("window error: {0}")]
    Window(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CanvasError {
    /// Asset and configuration misuse: the caller should not keep drawing.
    /// Print and window failures leave the canvas usable.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::PrintUnsupported(_) | Self::Print(_) | Self::Window(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(CanvasError::Config("x".into()).to_string().contains("config error:"));
        assert!(CanvasError::MissingGlyph('A').to_string().contains("'A'"));
        assert!(
            CanvasError::MissingSpriteIndex("char_a".into())
                .to_string()
                .contains("char_a")
        );
    }

    #[test]
    fn print_failures_are_recoverable() {
        assert!(!CanvasError::PrintUnsupported("windows".into()).is_fatal());
        assert!(!CanvasError::Print("offline".into()).is_fatal());
        assert!(CanvasError::SpritesNotLoaded.is_fatal());
        assert!(CanvasError::MalformedSprites("x".into()).is_fatal());
    }

    #[test]
    fn io_preserves_source() {
        let err = CanvasError::from(std::io::Error::other("boom"));
        assert!(err.to_string().contains("boom"));
    }
}
