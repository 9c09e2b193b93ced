//! Free-capacity advice: how many more copies of the last artwork fit in the
//! length the customer already pays for.
//!
//! The advisor re-packs a scratch inventory from scratch after every appended
//! copy, so it costs O(k²) packings for k suggested copies. Typical k is below a
//! few dozen; `RollConfig::max_autofill` bounds the search.

use crate::config::RollConfig;
use crate::error::Result;
use crate::model::Artwork;
use crate::pipeline::{compute_layout, pack_artworks};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const LENGTH_EPSILON: f64 = 1e-9;

/// Result of an auto-fill simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutoFill {
    /// Key of the artwork that would be duplicated.
    pub key: String,
    /// Copies that fit without raising the billable length (may be 0).
    pub count: usize,
    /// Billable length the copies fit into.
    pub billable_length: f64,
    /// True if the search stopped at `max_autofill` rather than at the roll length.
    pub capped: bool,
}

#[instrument(skip_all)]
/// Simulates appending copies of the last artwork until the next copy would push
/// the used length past the current billable length.
///
/// Returns `None` for an empty inventory.
pub fn suggest_autofill(artworks: &[Artwork], cfg: &RollConfig) -> Result<Option<AutoFill>> {
    let Some(last) = artworks.last() else {
        return Ok(None);
    };
    let target = compute_layout(artworks, cfg)?.billable_length;

    let mut scratch: Vec<Artwork> = artworks.to_vec();
    let mut count = 0usize;
    let mut capped = true;
    while count < cfg.max_autofill {
        scratch.push(last.clone());
        let placement = pack_artworks(&scratch, cfg)?;
        if placement.content_length + cfg.header_allowance > target + LENGTH_EPSILON {
            capped = false;
            break;
        }
        count += 1;
    }
    if capped {
        warn!(
            key = last.key(),
            limit = cfg.max_autofill,
            "auto-fill search hit its limit"
        );
    }
    debug!(key = last.key(), count, target, "auto-fill simulated");
    Ok(Some(AutoFill {
        key: last.key().to_string(),
        count,
        billable_length: target,
        capped,
    }))
}
