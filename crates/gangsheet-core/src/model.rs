use crate::error::{GangSheetError, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Source DPI assumed when the decoder finds no density metadata.
pub const DEFAULT_SOURCE_DPI: f64 = 300.0;

/// Smallest natural print size (inches) given to a decoded artwork.
pub const MIN_NATURAL_SIZE: f64 = 0.1;

/// Axis-aligned rectangle in inches. `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
    /// True if the interiors of `self` and `other` intersect, with `eps` slack for touching edges.
    pub fn overlaps(&self, other: &Rect, eps: f64) -> bool {
        self.x < other.right() - eps
            && other.x < self.right() - eps
            && self.y < other.bottom() - eps
            && other.y < self.bottom() - eps
    }
}

/// A piece of artwork queued for the roll.
///
/// The raster is shared between duplicates, so cloning an `Artwork` is cheap.
#[derive(Debug, Clone)]
pub struct Artwork {
    key: String,
    image: Arc<RgbaImage>,
    width: f64,
    height: f64,
    source_dpi: f64,
}

impl Artwork {
    /// Creates an artwork printed at its natural size (`pixels / source_dpi`, rounded to 0.01 in,
    /// at least 0.1 in per side).
    pub fn new(key: impl Into<String>, image: RgbaImage, source_dpi: f64) -> Result<Self> {
        let dpi = if source_dpi.is_finite() && source_dpi > 0.0 {
            source_dpi
        } else {
            DEFAULT_SOURCE_DPI
        };
        let (pw, ph) = image.dimensions();
        let width = round_hundredths(pw as f64 / dpi).max(MIN_NATURAL_SIZE);
        let height = round_hundredths(ph as f64 / dpi).max(MIN_NATURAL_SIZE);
        validate_print_size(width, height)?;
        Ok(Self {
            key: key.into(),
            image: Arc::new(image),
            width,
            height,
            source_dpi: dpi,
        })
    }

    /// Creates an artwork with an explicit print size in inches.
    pub fn with_print_size(
        key: impl Into<String>,
        image: RgbaImage,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        let mut art = Self {
            key: key.into(),
            image: Arc::new(image),
            width: 0.0,
            height: 0.0,
            source_dpi: DEFAULT_SOURCE_DPI,
        };
        art.set_print_size(width, height)?;
        Ok(art)
    }

    /// Replaces the requested print size. Both dimensions must be finite and > 0.
    pub fn set_print_size(&mut self, width: f64, height: f64) -> Result<()> {
        validate_print_size(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
    /// Requested print width in inches.
    pub fn width(&self) -> f64 {
        self.width
    }
    /// Requested print height in inches.
    pub fn height(&self) -> f64 {
        self.height
    }
    pub fn source_dpi(&self) -> f64 {
        self.source_dpi
    }
    /// Source resolution in pixels.
    pub fn source_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
    /// True if both artworks share the same raster buffer.
    pub fn shares_raster_with(&self, other: &Artwork) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
    /// Identity of the shared raster buffer, stable while any copy is alive.
    pub(crate) fn raster_id(&self) -> usize {
        Arc::as_ptr(&self.image) as usize
    }
}

fn validate_print_size(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(GangSheetError::InvalidDimensions { width, height })
    }
}

fn round_hundredths(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// One artwork placed on the roll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedArtwork {
    /// Position of the artwork in the inventory it was packed from.
    pub index: usize,
    pub key: String,
    /// Artwork top-left in content coordinates (inches).
    pub x: f64,
    pub y: f64,
    /// Effective size after the orientation decision.
    pub width: f64,
    pub height: f64,
    /// True if the artwork was turned 90° to fit or to save length.
    pub rotated: bool,
    /// Margin-inclusive cell reserved for this artwork; frames never overlap.
    pub frame: Rect,
}

/// Result of a packing run, in packing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    pub items: Vec<PlacedArtwork>,
    /// Roll length consumed by the packed content (inches).
    pub content_length: f64,
}

impl Placement {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A packed roll together with its billing figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    pub placement: Placement,
    pub roll_width: f64,
    pub margin: f64,
    /// Band reserved above the content for the job header.
    pub header_allowance: f64,
    /// Content length plus header, rounded up to the billing unit (0 when empty).
    pub billable_length: f64,
}

/// Statistics about material usage of a layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayoutStats {
    /// Number of placed artworks.
    pub num_items: usize,
    /// Number of rotated artworks.
    pub num_rotated: usize,
    pub content_length: f64,
    pub billable_length: f64,
    /// Billed film left blank after the content and header (inches).
    pub wasted_length: f64,
    /// Total roll area billed (square inches).
    pub billed_area: f64,
    /// Sum of artwork areas (square inches).
    pub artwork_area: f64,
    /// artwork_area / billed_area (0.0 to 1.0). Higher is better.
    pub utilization: f64,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.placement.is_empty()
    }

    pub fn content_length(&self) -> f64 {
        self.placement.content_length
    }

    /// Length consumed including the header band.
    pub fn used_length(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.placement.content_length + self.header_allowance
        }
    }

    /// Price of the billed length at `price_per_foot`.
    pub fn cost(&self, price_per_foot: f64) -> f64 {
        crate::quantize::cost(self.billable_length, price_per_foot)
    }

    /// Computes usage statistics for this layout.
    pub fn stats(&self) -> LayoutStats {
        let num_items = self.placement.items.len();
        let num_rotated = self.placement.items.iter().filter(|p| p.rotated).count();
        let artwork_area: f64 = self
            .placement
            .items
            .iter()
            .map(|p| p.width * p.height)
            .sum();
        let billed_area = self.roll_width * self.billable_length;
        let utilization = if billed_area > 0.0 {
            artwork_area / billed_area
        } else {
            0.0
        };
        LayoutStats {
            num_items,
            num_rotated,
            content_length: self.placement.content_length,
            billable_length: self.billable_length,
            wasted_length: (self.billable_length - self.used_length()).max(0.0),
            billed_area,
            artwork_area,
            utilization,
        }
    }
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Items: {}, Rotated: {}, Content: {:.2}\", Billable: {}\", Wasted: {:.1}\", Utilization: {:.2}%",
            self.num_items,
            self.num_rotated,
            self.content_length,
            self.billable_length,
            self.wasted_length,
            self.utilization * 100.0,
        )
    }
}
