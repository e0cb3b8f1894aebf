//! Deterministic palette encoding for label masks.
//!
//! The color of a class id is derived purely from its bit pattern: 3-bit
//! groups are consumed from the low end, bit 0 of each group feeding R,
//! bit 1 feeding G, bit 2 feeding B, shifted into successively lower-order
//! positions starting at bit 7. Id 0 is always black.

use crate::image::RgbImageU8;
use crate::labels::LabelMask;

/// RGB triple for a class id. `class_color(0) == [0, 0, 0]`.
pub fn class_color(class_id: u32) -> [u8; 3] {
    let mut rgb = [0u8; 3];
    let mut lab = class_id;
    let mut shift = 7i32;
    while lab != 0 && shift >= 0 {
        rgb[0] |= (((lab) & 1) << shift) as u8;
        rgb[1] |= (((lab >> 1) & 1) << shift) as u8;
        rgb[2] |= (((lab >> 2) & 1) << shift) as u8;
        shift -= 1;
        lab >>= 3;
    }
    rgb
}

/// Palette for the first `num_classes` ids.
pub fn build_palette(num_classes: usize) -> Vec<[u8; 3]> {
    (0..num_classes as u32).map(class_color).collect()
}

/// Render a label mask as a viewable color image.
pub fn colorize_labels(mask: &LabelMask) -> RgbImageU8 {
    let mut out = RgbImageU8::new(mask.width(), mask.height());
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            out.set_pixel(x, y, class_color(mask.get(x, y) as u32));
        }
    }
    out
}
