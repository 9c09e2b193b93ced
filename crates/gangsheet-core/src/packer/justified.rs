use super::{PackItem, Packer, by_height_desc};
use crate::config::RollConfig;
use crate::model::{PlacedArtwork, Placement, Rect};

/// Row packer that spreads each row evenly across the roll.
///
/// Rows are filled like shelves, then the leftover width is distributed as equal
/// gaps between items (a lone item is centered). Items are vertically centered in
/// their row, and `margin` separates rows from each other and from the roll edges.
pub struct JustifiedPacker {
    config: RollConfig,
}

impl JustifiedPacker {
    pub fn new(config: RollConfig) -> Self {
        Self { config }
    }

    fn rows<'a>(&self, sorted: Vec<&'a PackItem>) -> Vec<Vec<&'a PackItem>> {
        let margin = self.config.margin;
        let mut rows: Vec<Vec<&PackItem>> = Vec::new();
        let mut row: Vec<&PackItem> = Vec::new();
        let mut row_w = 0.0_f64;
        for it in sorted {
            let need = it.width + 2.0 * margin;
            if !row.is_empty() && row_w + need > self.config.roll_width {
                rows.push(std::mem::take(&mut row));
                row_w = 0.0;
            }
            row.push(it);
            row_w += need;
        }
        if !row.is_empty() {
            rows.push(row);
        }
        rows
    }
}

impl Packer for JustifiedPacker {
    fn pack(&self, items: &[PackItem]) -> Placement {
        if items.is_empty() {
            return Placement::default();
        }
        let margin = self.config.margin;
        let roll_width = self.config.roll_width;

        let mut placed = Vec::with_capacity(items.len());
        let mut row_top = margin;

        for row in self.rows(by_height_desc(items)) {
            let row_h = row.iter().map(|it| it.height).fold(0.0_f64, f64::max);
            let used_w: f64 = row.iter().map(|it| it.width).sum();
            let free_w = roll_width - 2.0 * margin - used_w;

            let (mut x, gap) = if row.len() > 1 {
                (margin, free_w / (row.len() - 1) as f64)
            } else {
                (margin + free_w / 2.0, 0.0)
            };

            for it in row {
                placed.push(PlacedArtwork {
                    index: it.index,
                    key: it.key.clone(),
                    x,
                    y: row_top + (row_h - it.height) / 2.0,
                    width: it.width,
                    height: it.height,
                    rotated: it.rotated,
                    frame: Rect::new(
                        x - margin,
                        row_top - margin,
                        it.width + 2.0 * margin,
                        row_h + margin,
                    ),
                });
                x += it.width + gap;
            }
            row_top += row_h + margin;
        }

        Placement {
            items: placed,
            content_length: row_top,
        }
    }
}
