use crate::config::{PackingPolicy, RollConfig};
use crate::model::Placement;

pub mod justified;
pub mod shelf;

/// An artwork ready for packing: orientation already decided.
#[derive(Debug, Clone, PartialEq)]
pub struct PackItem {
    pub index: usize,
    pub key: String,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

/// A packer lays a batch of items onto the roll.
///
/// Implementations must ensure frames never overlap, stay inside the roll width,
/// and produce the same placement for the same input order.
pub trait Packer {
    fn pack(&self, items: &[PackItem]) -> Placement;
}

/// Instantiates the packer selected by `cfg.packing`.
pub fn packer_for(cfg: &RollConfig) -> Box<dyn Packer> {
    match cfg.packing {
        PackingPolicy::Shelf => Box::new(shelf::ShelfPacker::new(cfg.clone())),
        PackingPolicy::Justified => Box::new(justified::JustifiedPacker::new(cfg.clone())),
    }
}

/// Items ordered by margin-inclusive height, tallest first.
/// The sort is stable so equal heights keep inventory order.
pub(crate) fn by_height_desc(items: &[PackItem]) -> Vec<&PackItem> {
    let mut sorted: Vec<&PackItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.height.total_cmp(&a.height));
    sorted
}
