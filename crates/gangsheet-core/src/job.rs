//! A print job: one inventory, its roll configuration, and customer details.
//!
//! Every read (layout, quote, render) recomputes from the current inventory;
//! nothing derived is cached between calls.

use crate::autofill::{AutoFill, suggest_autofill};
use crate::compositing::{RenderOptions, encode_png, render_raster};
use crate::config::RollConfig;
use crate::error::{GangSheetError, Result};
use crate::export::to_json_manifest;
use crate::export_pdf::render_pdf;
use crate::inventory::Inventory;
use crate::model::{Artwork, Layout, LayoutStats};
use crate::orientation::select_orientation;
use crate::pipeline::compute_layout;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Customer-facing job details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobDetails {
    #[serde(default = "default_customer")]
    pub customer: String,
    #[serde(default = "default_order_number")]
    pub order_number: String,
    #[serde(default = "default_price_per_foot")]
    pub price_per_foot: f64,
}

impl Default for JobDetails {
    fn default() -> Self {
        Self {
            customer: default_customer(),
            order_number: default_order_number(),
            price_per_foot: default_price_per_foot(),
        }
    }
}

fn default_customer() -> String {
    "Retail Client".into()
}
fn default_order_number() -> String {
    "1001".into()
}
fn default_price_per_foot() -> f64 {
    15.0
}

/// Price and material summary for the current inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub stats: LayoutStats,
    pub cost: f64,
    /// Free copies of the last artwork that fit the billed length.
    pub autofill: Option<AutoFill>,
}

pub struct Job {
    details: JobDetails,
    config: RollConfig,
    inventory: Inventory,
}

impl Job {
    /// Starts an empty job. Fails if `config` is invalid.
    pub fn new(details: JobDetails, config: RollConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            details,
            config,
            inventory: Inventory::new(),
        })
    }

    pub fn details(&self) -> &JobDetails {
        &self.details
    }
    pub fn config(&self) -> &RollConfig {
        &self.config
    }
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Adds `qty` copies of `art`. Artwork that cannot fit the roll in either
    /// orientation is rejected before anything is added.
    pub fn add_artwork(&mut self, art: Artwork, qty: usize) -> Result<()> {
        if qty == 0 {
            return Err(GangSheetError::InvalidConfig(
                "quantity must be at least 1".into(),
            ));
        }
        select_orientation(art.key(), art.width(), art.height(), &self.config)?;
        info!(key = art.key(), qty, w = art.width(), h = art.height(), "artwork added");
        self.inventory.push_copies(&art, qty);
        Ok(())
    }

    /// Changes the print size of one inventory entry; the old size is kept on error.
    pub fn resize_artwork(&mut self, index: usize, width: f64, height: f64) -> Result<()> {
        let config = &self.config;
        let art = self.inventory.get_mut(index)?;
        select_orientation(art.key(), width, height, config)?;
        art.set_print_size(width, height)
    }

    /// Removes every artwork.
    pub fn clear(&mut self) {
        self.inventory.clear();
    }

    pub fn layout(&self) -> Result<Layout> {
        compute_layout(self.inventory.as_slice(), &self.config)
    }

    #[instrument(skip_all)]
    pub fn quote(&self) -> Result<Quote> {
        let layout = self.layout()?;
        Ok(Quote {
            stats: layout.stats(),
            cost: layout.cost(self.details.price_per_foot),
            autofill: self.autofill_suggestion()?,
        })
    }

    pub fn autofill_suggestion(&self) -> Result<Option<AutoFill>> {
        suggest_autofill(self.inventory.as_slice(), &self.config)
    }

    /// Appends the suggested number of copies of the last artwork. Returns the count added.
    pub fn apply_autofill(&mut self) -> Result<usize> {
        let Some(fill) = self.autofill_suggestion()? else {
            return Ok(0);
        };
        if let Some(last) = self.inventory.last().cloned() {
            self.inventory.push_copies(&last, fill.count);
        }
        info!(key = %fill.key, count = fill.count, "auto-fill applied");
        Ok(fill.count)
    }

    /// Text for the header band.
    pub fn header_text(&self) -> String {
        format!(
            "CUSTOMER: {} | ORDER: #{}",
            self.details.customer, self.details.order_number
        )
    }

    /// Renders the sheet as a PNG carrying the render DPI.
    pub fn render_png(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let layout = self.layout()?;
        let canvas = render_raster(&layout, self.inventory.as_slice(), self.config.dpi, opts)?;
        encode_png(&canvas, self.config.dpi)
    }

    /// Renders the sheet as a single-page PDF.
    pub fn render_pdf(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let layout = self.layout()?;
        render_pdf(&layout, self.inventory.as_slice(), opts)
    }

    pub fn manifest(&self) -> Result<serde_json::Value> {
        Ok(to_json_manifest(&self.layout()?, &self.details))
    }

    /// `Order_{order}_{customer}.pdf`
    pub fn pdf_file_name(&self) -> String {
        format!(
            "Order_{}_{}.pdf",
            sanitize(&self.details.order_number),
            sanitize(&self.details.customer)
        )
    }

    /// `{customer}_{order}.png`
    pub fn png_file_name(&self) -> String {
        format!(
            "{}_{}.png",
            sanitize(&self.details.customer),
            sanitize(&self.details.order_number)
        )
    }
}

/// Keeps file names portable: path separators and reserved characters become `_`.
fn sanitize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
