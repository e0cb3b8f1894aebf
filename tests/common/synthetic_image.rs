use charmask::prelude::*;

/// Uniform color image.
pub fn solid_rgb(width: usize, height: usize, rgb: [u8; 3]) -> RgbImageU8 {
    let mut img = RgbImageU8::new(width, height);
    for y in 0..height {
        for x in 0..width {
            img.set_pixel(x, y, rgb);
        }
    }
    img
}

/// Color image with a filled axis-aligned rectangle `[x0, x1) × [y0, y1)`.
pub fn rgb_with_rect(
    width: usize,
    height: usize,
    rect: (usize, usize, usize, usize),
    rgb: [u8; 3],
) -> RgbImageU8 {
    let (x0, y0, x1, y1) = rect;
    let mut img = RgbImageU8::new(width, height);
    for y in y0..y1.min(height) {
        for x in x0..x1.min(width) {
            img.set_pixel(x, y, rgb);
        }
    }
    img
}

/// Grayscale image with a filled rectangle `[x0, x1) × [y0, y1)`.
pub fn gray_with_rect(
    width: usize,
    height: usize,
    rect: (usize, usize, usize, usize),
    value: u8,
) -> GrayImageU8 {
    let (x0, y0, x1, y1) = rect;
    let mut img = GrayImageU8::new(width, height);
    for y in y0..y1.min(height) {
        for x in x0..x1.min(width) {
            img.set(x, y, value);
        }
    }
    img
}
