use crate::error::Warning;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pixel-space rectangle within a source raster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Output of [`trim_transparent`].
#[derive(Debug, Clone)]
pub struct Trimmed {
    pub image: RgbaImage,
    /// Region of the source that was kept.
    pub source: PixelRect,
    pub warning: Option<Warning>,
}

/// Smallest rectangle containing every pixel with alpha > `threshold`,
/// or `None` if the raster has no such pixel.
pub fn compute_trim_rect(rgba: &RgbaImage, threshold: u8) -> Option<PixelRect> {
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let opaque_col =
        |x: u32, y0: u32, y1: u32| (y0..=y1).any(|y| rgba.get_pixel(x, y)[3] > threshold);
    let opaque_row =
        |y: u32, x0: u32, x1: u32| (x0..=x1).any(|x| rgba.get_pixel(x, y)[3] > threshold);
    let mut x1 = 0;
    let mut y1 = 0;
    let mut x2 = w - 1;
    let mut y2 = h - 1;
    // left
    while x1 < w && !opaque_col(x1, 0, h - 1) {
        x1 += 1;
    }
    if x1 >= w {
        return None;
    }
    // right
    while x2 > x1 && !opaque_col(x2, 0, h - 1) {
        x2 -= 1;
    }
    // top
    while y1 < h && !opaque_row(y1, x1, x2) {
        y1 += 1;
    }
    // bottom
    while y2 > y1 && !opaque_row(y2, x1, x2) {
        y2 -= 1;
    }
    Some(PixelRect::new(x1, y1, x2 - x1 + 1, y2 - y1 + 1))
}

/// Crops transparent borders off `rgba`.
///
/// A fully transparent raster is returned unchanged with an `EmptyTrimResult` warning.
pub fn trim_transparent(key: &str, rgba: RgbaImage, threshold: u8) -> Trimmed {
    let (w, h) = rgba.dimensions();
    match compute_trim_rect(&rgba, threshold) {
        Some(r) if r == PixelRect::new(0, 0, w, h) => Trimmed {
            image: rgba,
            source: r,
            warning: None,
        },
        Some(r) => Trimmed {
            image: image::imageops::crop_imm(&rgba, r.x, r.y, r.w, r.h).to_image(),
            source: r,
            warning: None,
        },
        None => {
            warn!(key, "no opaque pixels; keeping artwork untrimmed");
            Trimmed {
                image: rgba,
                source: PixelRect::new(0, 0, w, h),
                warning: Some(Warning::EmptyTrimResult {
                    key: key.to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn crops_to_opaque_bounds() {
        let mut img = RgbaImage::new(10, 8);
        img.put_pixel(2, 3, Rgba([255, 0, 0, 255]));
        img.put_pixel(6, 5, Rgba([0, 255, 0, 128]));
        let t = trim_transparent("a", img, 0);
        assert_eq!(t.source, PixelRect::new(2, 3, 5, 3));
        assert_eq!(t.image.dimensions(), (5, 3));
        assert!(t.warning.is_none());
    }

    #[test]
    fn threshold_ignores_faint_pixels() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 10]));
        img.put_pixel(3, 3, Rgba([0, 0, 0, 255]));
        assert_eq!(compute_trim_rect(&img, 16), Some(PixelRect::new(3, 3, 1, 1)));
    }

    #[test]
    fn fully_transparent_warns_and_keeps_input() {
        let img = RgbaImage::new(6, 6);
        let t = trim_transparent("ghost.png", img, 0);
        assert_eq!(t.image.dimensions(), (6, 6));
        assert_eq!(
            t.warning,
            Some(Warning::EmptyTrimResult {
                key: "ghost.png".into()
            })
        );
    }
}
