use crate::config::RollConfig;
use crate::error::Result;
use crate::model::{Artwork, Layout, Placement};
use crate::orientation::select_orientation;
use crate::packer::{PackItem, packer_for};
use crate::quantize::billable_length;
use tracing::{debug, instrument};

/// Orients every artwork and packs the batch with the configured policy.
///
/// Notes:
/// - Fails with `ArtworkTooWide` on the first artwork that cannot fit the roll.
/// - Sorting inside the packers is stable, so identical inputs give identical placements.
/// - An empty slice packs to an empty placement of length 0.
pub fn pack_artworks(artworks: &[Artwork], cfg: &RollConfig) -> Result<Placement> {
    let items = prepare(
        artworks
            .iter()
            .map(|a| (a.key(), a.width(), a.height())),
        cfg,
    )?;
    Ok(packer_for(cfg).pack(&items))
}

#[instrument(skip_all)]
/// Packs `artworks` and computes the billable length.
pub fn compute_layout(artworks: &[Artwork], cfg: &RollConfig) -> Result<Layout> {
    cfg.validate()?;
    let placement = pack_artworks(artworks, cfg)?;
    let layout = finish_layout(placement, cfg);
    debug!(
        items = layout.placement.items.len(),
        content = layout.placement.content_length,
        billable = layout.billable_length,
        "layout computed"
    );
    Ok(layout)
}

// ---------------- Layout-only API ----------------

/// Packs print sizes without raster data.
/// Inputs are (key, width, height) in inches; the placement index is the input position.
pub fn pack_layout<K: AsRef<str>>(inputs: &[(K, f64, f64)], cfg: &RollConfig) -> Result<Layout> {
    cfg.validate()?;
    let items = prepare(
        inputs.iter().map(|(k, w, h)| (k.as_ref(), *w, *h)),
        cfg,
    )?;
    let placement = packer_for(cfg).pack(&items);
    Ok(finish_layout(placement, cfg))
}

fn prepare<'a>(
    dims: impl Iterator<Item = (&'a str, f64, f64)>,
    cfg: &RollConfig,
) -> Result<Vec<PackItem>> {
    dims.enumerate()
        .map(|(index, (key, w, h))| {
            let o = select_orientation(key, w, h, cfg)?;
            Ok(PackItem {
                index,
                key: key.to_string(),
                width: o.width,
                height: o.height,
                rotated: o.rotated,
            })
        })
        .collect()
}

fn finish_layout(placement: Placement, cfg: &RollConfig) -> Layout {
    let billable = billable_length(
        placement.content_length,
        cfg.header_allowance,
        cfg.billing_unit,
    );
    Layout {
        placement,
        roll_width: cfg.roll_width,
        margin: cfg.margin,
        header_allowance: cfg.header_allowance,
        billable_length: billable,
    }
}
