use thiserror::Error;

#[derive(Debug, Error)]
pub enum GangSheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error(
        "Artwork '{key}' ({width}x{height} in) does not fit a {roll_width} in roll with {margin} in margins, even rotated"
    )]
    ArtworkTooWide {
        key: String,
        width: f64,
        height: f64,
        roll_width: f64,
        margin: f64,
    },
    #[error("Invalid print dimensions: {width}x{height} in (both must be > 0)")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to decode vector artwork: {0}")]
    VectorDecodeFailure(String),
    #[error("Inventory is empty; nothing to render")]
    EmptyInventory,
    #[error("Inventory index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, GangSheetError>;

/// Non-fatal conditions surfaced to the operator alongside a successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Trimming found no opaque pixel; the original raster was kept.
    EmptyTrimResult { key: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::EmptyTrimResult { key } => {
                write!(f, "'{key}' is fully transparent; kept untrimmed")
            }
        }
    }
}
