use super::{PackItem, Packer, by_height_desc};
use crate::config::RollConfig;
use crate::model::{PlacedArtwork, Placement, Rect};

/// Greedy flush-left shelf packer.
///
/// Every artwork reserves `margin` on all four sides. Footprints are placed left
/// to right; when the next one would cross the roll edge a new shelf opens below
/// the tallest footprint of the current one.
pub struct ShelfPacker {
    config: RollConfig,
}

impl ShelfPacker {
    pub fn new(config: RollConfig) -> Self {
        Self { config }
    }
}

impl Packer for ShelfPacker {
    fn pack(&self, items: &[PackItem]) -> Placement {
        let margin = self.config.margin;
        let roll_width = self.config.roll_width;

        let mut placed = Vec::with_capacity(items.len());
        let mut cur_x = 0.0_f64;
        let mut cur_y = 0.0_f64;
        let mut shelf_h = 0.0_f64;

        for it in by_height_desc(items) {
            let total_w = it.width + 2.0 * margin;
            let total_h = it.height + 2.0 * margin;
            if cur_x + total_w > roll_width {
                cur_x = 0.0;
                cur_y += shelf_h;
                shelf_h = 0.0;
            }
            placed.push(PlacedArtwork {
                index: it.index,
                key: it.key.clone(),
                x: cur_x + margin,
                y: cur_y + margin,
                width: it.width,
                height: it.height,
                rotated: it.rotated,
                frame: Rect::new(cur_x, cur_y, total_w, total_h),
            });
            cur_x += total_w;
            shelf_h = shelf_h.max(total_h);
        }

        Placement {
            items: placed,
            content_length: cur_y + shelf_h,
        }
    }
}
