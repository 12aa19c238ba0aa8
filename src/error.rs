use thiserror::Error;

/// Errors raised by color extraction and theme generation.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// An operation that needs an image was called before one was loaded.
    #[error("No image loaded")]
    NotLoaded,

    /// Pixel coordinates fall outside the loaded image.
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// A color string was not six hex digits (optionally prefixed with `#`).
    #[error("Invalid hex color '{0}': expected 6 hex digits (RRGGBB)")]
    InvalidColor(String),

    /// The image has no pixels, or none opaque enough to pick a base color from.
    #[error("Image contains no usable pixels")]
    EmptyImage,

    #[error("Unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Unable to serialize theme: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = ThemeError> = std::result::Result<T, E>;
