//! Resampling used to align fusion inputs on a common pixel grid.

use super::RgbImageU8;

/// Bilinear resize for color images with the center-aligned convention:
/// destination pixel `x` samples the source at `(x + 0.5) * scale - 0.5`,
/// clamped to the image bounds.
pub fn resize_bilinear_rgb(src: &RgbImageU8, width: usize, height: usize) -> RgbImageU8 {
    if width == src.width() && height == src.height() {
        return src.clone();
    }
    let mut out = RgbImageU8::new(width, height);
    if width == 0 || height == 0 || src.width() == 0 || src.height() == 0 {
        return out;
    }
    let scale_x = src.width() as f32 / width as f32;
    let scale_y = src.height() as f32 / height as f32;
    for y in 0..height {
        let sy = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, (src.height() - 1) as f32);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(src.height() - 1);
        let ty = sy - y0 as f32;
        for x in 0..width {
            let sx = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, (src.width() - 1) as f32);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(src.width() - 1);
            let tx = sx - x0 as f32;

            let p00 = src.pixel(x0, y0);
            let p10 = src.pixel(x1, y0);
            let p01 = src.pixel(x0, y1);
            let p11 = src.pixel(x1, y1);
            let mut rgb = [0u8; 3];
            for c in 0..3 {
                let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
                let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
                rgb[c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
            }
            out.set_pixel(x, y, rgb);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_resize_is_a_copy() {
        let mut src = RgbImageU8::new(5, 3);
        src.set_pixel(2, 1, [9, 8, 7]);
        assert_eq!(resize_bilinear_rgb(&src, 5, 3), src);
    }

    #[test]
    fn bilinear_uniform_stays_uniform() {
        let mut src = RgbImageU8::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                src.set_pixel(x, y, [10, 20, 30]);
            }
        }
        let up = resize_bilinear_rgb(&src, 7, 5);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(up.pixel(x, y), [10, 20, 30]);
            }
        }
    }
}
