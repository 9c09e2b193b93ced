use crate::decode::dpi_to_ppm;
use crate::error::{GangSheetError, Result};
use crate::model::{Artwork, Layout, PlacedArtwork};
use crate::orientation::oriented_raster;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Options shared by the raster and PDF renderers.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Flip the finished sheet horizontally (film printed from the back).
    pub mirror: bool,
    /// Job identification drawn in the header band. Only the PDF renderer draws
    /// text; the raster renderer leaves the band blank and logs a warning.
    pub header_text: Option<String>,
}

/// Inches to whole pixels at `dpi`.
fn to_px(inches: f64, dpi: f64) -> u32 {
    (inches * dpi).round().max(0.0) as u32
}

/// Rotates and resamples one placed artwork to its print size in pixels.
fn render_tile(art: &Artwork, item: &PlacedArtwork, dpi: f64) -> RgbaImage {
    let tw = to_px(item.width, dpi).max(1);
    let th = to_px(item.height, dpi).max(1);
    let src = oriented_raster(art.image(), item.rotated);
    if src.dimensions() == (tw, th) {
        return src;
    }
    imageops::resize(&src, tw, th, FilterType::Lanczos3)
}

fn lookup<'a>(artworks: &'a [Artwork], item: &PlacedArtwork) -> Result<&'a Artwork> {
    artworks
        .get(item.index)
        .ok_or(GangSheetError::IndexOutOfRange {
            index: item.index,
            len: artworks.len(),
        })
}

#[instrument(skip_all)]
/// Composites every placed artwork onto a transparent `roll_width x billable_length` canvas.
///
/// Notes:
/// - Artworks are resampled with Lanczos3 to their print size at `dpi` and alpha-blended.
/// - Placements are shifted down by the header allowance so the header band stays clear.
/// - `opts.mirror` flips the whole canvas as the last step.
/// - `opts.header_text` is not rasterized; the band stays transparent and a warning is logged.
/// - An empty layout is rejected with `EmptyInventory`; there is no roll to draw.
pub fn render_raster(
    layout: &Layout,
    artworks: &[Artwork],
    dpi: u32,
    opts: &RenderOptions,
) -> Result<RgbaImage> {
    if layout.is_empty() {
        return Err(GangSheetError::EmptyInventory);
    }
    if let Some(text) = &opts.header_text {
        warn!(%text, "raster output has no text renderer; header band left blank");
    }
    let dpi_f = dpi as f64;
    let canvas_w = to_px(layout.roll_width, dpi_f);
    let canvas_h = to_px(layout.billable_length, dpi_f);
    let mut canvas = RgbaImage::new(canvas_w, canvas_h);

    let items = &layout.placement.items;
    let sources: Vec<&Artwork> = items
        .iter()
        .map(|item| lookup(artworks, item))
        .collect::<Result<_>>()?;

    #[cfg(feature = "parallel")]
    let tiles: Vec<RgbaImage> = items
        .par_iter()
        .zip(sources.par_iter())
        .map(|(item, art)| render_tile(art, item, dpi_f))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let tiles: Vec<RgbaImage> = items
        .iter()
        .zip(sources.iter())
        .map(|(item, art)| render_tile(art, item, dpi_f))
        .collect();

    for (item, tile) in items.iter().zip(tiles.iter()) {
        let px = (item.x * dpi_f).round() as i64;
        let py = ((item.y + layout.header_allowance) * dpi_f).round() as i64;
        imageops::overlay(&mut canvas, tile, px, py);
    }

    if opts.mirror {
        imageops::flip_horizontal_in_place(&mut canvas);
    }
    debug!(w = canvas_w, h = canvas_h, items = items.len(), "raster composed");
    Ok(canvas)
}

/// Encodes `canvas` as PNG with a `pHYs` chunk so the sheet prints at its true size.
pub fn encode_png(canvas: &RgbaImage, dpi: u32) -> Result<Vec<u8>> {
    let (w, h) = canvas.dimensions();
    let ppm = dpi_to_ppm(dpi);
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, w, h);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder
            .write_header()
            .map_err(|e| GangSheetError::Encode(e.to_string()))?;
        writer
            .write_image_data(canvas.as_raw())
            .map_err(|e| GangSheetError::Encode(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| GangSheetError::Encode(e.to_string()))?;
    }
    Ok(buf)
}
