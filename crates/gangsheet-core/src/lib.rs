//! Core library for laying out DTF gang sheets on a fixed-width roll.
//!
//! - Orientation: rotate an artwork when it only fits turned, or when turning it saves length
//! - Packers: flush-left Shelf and evenly spaced Justified rows
//! - Billing: content length plus header rounded up to the billing unit; auto-fill advice
//! - Output: Lanczos-resampled RGBA canvas (PNG with DPI) or a single-page PDF
//!
//! Quick example:
//! ```ignore
//! use gangsheet_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let logo = image::open("logo.png")?.to_rgba8();
//! let mut job = Job::new(JobDetails::default(), RollConfig::default())?;
//! job.add_artwork(Artwork::with_print_size("logo.png", logo, 10.0, 10.0)?, 2)?;
//! let quote = job.quote()?;
//! println!("{} in, ${:.2}", quote.stats.billable_length, quote.cost);
//! let pdf = job.render_pdf(&RenderOptions::default())?;
//! # Ok(()) }
//! ```

pub mod autofill;
pub mod compositing;
pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod export_pdf;
pub mod inventory;
pub mod job;
pub mod model;
pub mod orientation;
pub mod packer;
pub mod pipeline;
pub mod quantize;
pub mod trim;

pub use autofill::*;
pub use compositing::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use export_pdf::*;
pub use inventory::*;
pub use job::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `gangsheet_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::autofill::{AutoFill, suggest_autofill};
    pub use crate::compositing::{RenderOptions, encode_png, render_raster};
    pub use crate::config::{
        MarginPreset, PackingPolicy, RollConfig, RollConfigBuilder, RotationPolicy,
    };
    pub use crate::decode::{DecodedRaster, SourceFormat, VectorRasterizer, decode_artwork};
    pub use crate::error::{GangSheetError, Warning};
    pub use crate::export_pdf::render_pdf;
    pub use crate::inventory::Inventory;
    pub use crate::job::{Job, JobDetails, Quote};
    pub use crate::model::{Artwork, Layout, LayoutStats, PlacedArtwork, Placement, Rect};
    pub use crate::orientation::{Orientation, select_orientation};
    pub use crate::quantize::billable_length;
    pub use crate::trim::{Trimmed, trim_transparent};
    pub use crate::{compute_layout, pack_artworks, pack_layout};
}
