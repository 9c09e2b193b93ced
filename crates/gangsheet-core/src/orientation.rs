//! Per-artwork rotation decision.

use crate::config::{RollConfig, RotationPolicy};
use crate::error::{GangSheetError, Result};
use crate::model::Artwork;
use image::RgbaImage;

/// Effective print size of an artwork after the rotation decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

/// Chooses the orientation of a `width x height` artwork on the configured roll.
///
/// - neither orientation fits: `ArtworkTooWide`
/// - only the rotated one fits: rotate
/// - both fit: under `MinHeight`, rotate when that lowers the height; under `FitOnly`, keep
pub fn select_orientation(
    key: &str,
    width: f64,
    height: f64,
    cfg: &RollConfig,
) -> Result<Orientation> {
    let fits_as_is = width + 2.0 * cfg.margin <= cfg.roll_width;
    let fits_rotated = height + 2.0 * cfg.margin <= cfg.roll_width;

    let rotated = match (fits_as_is, fits_rotated) {
        (false, false) => {
            return Err(GangSheetError::ArtworkTooWide {
                key: key.to_string(),
                width,
                height,
                roll_width: cfg.roll_width,
                margin: cfg.margin,
            });
        }
        (false, true) => true,
        (true, false) => false,
        (true, true) => match cfg.rotation {
            RotationPolicy::MinHeight => height > width,
            RotationPolicy::FitOnly => false,
        },
    };

    Ok(if rotated {
        Orientation {
            width: height,
            height: width,
            rotated,
        }
    } else {
        Orientation {
            width,
            height,
            rotated,
        }
    })
}

/// Orientation of an inventory artwork.
pub fn orient(art: &Artwork, cfg: &RollConfig) -> Result<Orientation> {
    select_orientation(art.key(), art.width(), art.height(), cfg)
}

/// Materializes the raster in its placed orientation (90° counter-clockwise when rotated).
pub fn oriented_raster(src: &RgbaImage, rotated: bool) -> RgbaImage {
    if rotated {
        image::imageops::rotate270(src)
    } else {
        src.clone()
    }
}
