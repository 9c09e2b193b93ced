//! Decoding boundary: file bytes in, RGBA raster plus source DPI out.
//!
//! Raster formats go through `image`; vector formats are handed to a caller-supplied
//! [`VectorRasterizer`] because this crate does not rasterize PDF/AI/EPS itself.

use crate::error::{GangSheetError, Result};
use crate::model::DEFAULT_SOURCE_DPI;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const METERS_PER_INCH: f64 = 0.0254;
const CM_PER_INCH: f64 = 2.54;
/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Artwork source formats accepted at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Pdf,
    Ai,
    Eps,
}

impl SourceFormat {
    /// Detects the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }

    pub fn is_vector(self) -> bool {
        matches!(self, SourceFormat::Pdf | SourceFormat::Ai | SourceFormat::Eps)
    }
}

impl FromStr for SourceFormat {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            "ai" => Ok(Self::Ai),
            "eps" => Ok(Self::Eps),
            _ => Err(()),
        }
    }
}

/// Decoded artwork before it is sized for print.
#[derive(Debug, Clone)]
pub struct DecodedRaster {
    pub image: RgbaImage,
    /// Pixels per inch of the source, used for the default print size.
    pub dpi: f64,
}

/// Rasterizes the first page of a vector document.
///
/// `zoom` is the scale from PDF points to output pixels (`target_dpi / 72`).
pub trait VectorRasterizer {
    fn rasterize_first_page(
        &self,
        bytes: &[u8],
        format: SourceFormat,
        zoom: f64,
    ) -> std::result::Result<RgbaImage, String>;
}

/// Decodes `bytes` of the given format.
///
/// Vector input requires `rasterizer`; without one the call fails with `VectorDecodeFailure`.
pub fn decode_artwork(
    bytes: &[u8],
    format: SourceFormat,
    target_dpi: u32,
    rasterizer: Option<&dyn VectorRasterizer>,
) -> Result<DecodedRaster> {
    match format {
        SourceFormat::Png => {
            let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
            let dpi = png_dpi(bytes).unwrap_or(DEFAULT_SOURCE_DPI);
            debug!(w = image.width(), h = image.height(), dpi, "decoded png");
            Ok(DecodedRaster { image, dpi })
        }
        SourceFormat::Jpeg => {
            let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?.to_rgba8();
            let dpi = jpeg_dpi(bytes).unwrap_or(DEFAULT_SOURCE_DPI);
            debug!(w = image.width(), h = image.height(), dpi, "decoded jpeg");
            Ok(DecodedRaster { image, dpi })
        }
        SourceFormat::Pdf | SourceFormat::Ai | SourceFormat::Eps => {
            let rasterizer = rasterizer.ok_or_else(|| {
                GangSheetError::VectorDecodeFailure(format!(
                    "no vector rasterizer available for {format:?} input"
                ))
            })?;
            let zoom = target_dpi as f64 / POINTS_PER_INCH;
            let image = rasterizer
                .rasterize_first_page(bytes, format, zoom)
                .map_err(GangSheetError::VectorDecodeFailure)?;
            if image.width() == 0 || image.height() == 0 {
                return Err(GangSheetError::VectorDecodeFailure(
                    "rasterizer returned an empty page".into(),
                ));
            }
            Ok(DecodedRaster {
                image,
                dpi: target_dpi as f64,
            })
        }
    }
}

/// Horizontal density from a PNG `pHYs` chunk, when it is given in pixels per meter.
pub fn png_dpi(bytes: &[u8]) -> Option<f64> {
    let reader = png::Decoder::new(Cursor::new(bytes)).read_info().ok()?;
    let dims = reader.info().pixel_dims?;
    match dims.unit {
        png::Unit::Meter if dims.xppu > 0 => {
            Some((dims.xppu as f64 * METERS_PER_INCH * 100.0).round() / 100.0)
        }
        _ => None,
    }
}

/// Horizontal density from the JFIF header, when it is given in dots per inch or per cm.
///
/// Unit 0 only records an aspect ratio, so it yields `None`.
pub fn jpeg_dpi(bytes: &[u8]) -> Option<f64> {
    let mut decoder = zune_jpeg::JpegDecoder::new(bytes);
    decoder.decode_headers().ok()?;
    let info = decoder.info()?;
    if info.x_density == 0 {
        return None;
    }
    let density = info.x_density as f64;
    match info.pixel_density {
        1 => Some(density),
        2 => Some((density * CM_PER_INCH * 100.0).round() / 100.0),
        _ => None,
    }
}

/// Pixels per meter for a DPI value, as stored in PNG `pHYs`.
pub fn dpi_to_ppm(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}
