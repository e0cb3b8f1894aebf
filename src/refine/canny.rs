//! Hysteresis edge detection on part-boundary visualizations.
//!
//! Canny-style three-stage detector:
//!
//! - 3×3 Sobel gradients with border clamping, L1 magnitude
//!   (`|gx| + |gy|`), so the conventional 8-bit threshold pairs keep their
//!   meaning.
//! - Non-maximum suppression along the quantized gradient direction
//!   (4 bins; the two comparison neighbors are picked by the 22.5° rule).
//! - Two-threshold hysteresis: pixels above `high` are edges; pixels above
//!   `low` survive only when 8-connected to an edge.
//!
//! The outermost 1-pixel frame is ignored to keep neighbor lookups in
//! bounds.

use crate::image::{GrayImageU8, ImageF32};
use log::debug;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const TAN_22_5_DEG: f32 = 0.41421356237;

struct Grad {
    gx: ImageF32,
    gy: ImageF32,
    /// L1 magnitude per pixel: `|gx| + |gy|`
    mag: ImageF32,
}

fn sobel_gradients(l: &ImageF32) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                sum_x += row[x_idx[0]] * kx_row[0]
                    + row[x_idx[1]] * kx_row[1]
                    + row[x_idx[2]] * kx_row[2];
                sum_y += row[x_idx[0]] * ky_row[0]
                    + row[x_idx[1]] * ky_row[1]
                    + row[x_idx[2]] * ky_row[2];
            }

            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = sum_x.abs() + sum_y.abs();
        }
    }

    Grad { gx, gy, mag }
}

const NONE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Detect edges in a grayscale image; output pixels are 0 or 255.
pub fn canny(gray: &GrayImageU8, low: f32, high: f32) -> GrayImageU8 {
    let w = gray.width();
    let h = gray.height();
    let mut out = GrayImageU8::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }
    let (low, high) = if low <= high { (low, high) } else { (high, low) };

    let plane = ImageF32::from_gray(gray);
    let grad = sobel_gradients(&plane);

    // NMS + threshold classification
    let mut class = vec![NONE; w * h];
    let mut strong = Vec::new();
    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag < low {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            let (neighbor1, neighbor2) = if abs_gx >= abs_gy {
                if abs_gy <= abs_gx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if same_sign {
                    (mag_prev[x + 1], mag_next[x - 1])
                } else {
                    (mag_prev[x - 1], mag_next[x + 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x + 1], mag_next[x - 1])
            } else {
                (mag_prev[x - 1], mag_next[x + 1])
            };

            // Keep only direction-aligned local maxima.
            if mag < neighbor1 || mag <= neighbor2 {
                continue;
            }

            let idx = y * w + x;
            if mag >= high {
                class[idx] = STRONG;
                strong.push(idx);
            } else {
                class[idx] = WEAK;
            }
        }
    }

    // Hysteresis: grow strong edges through 8-connected weak pixels.
    let mut stack = strong;
    let mut edge_count = 0usize;
    while let Some(idx) = stack.pop() {
        let x = idx % w;
        let y = idx / w;
        out.set(x, y, 255);
        edge_count += 1;
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if class[nidx] == WEAK {
                    class[nidx] = STRONG;
                    stack.push(nidx);
                }
            }
        }
    }
    debug!("canny: {edge_count} edge pixels ({w}x{h}, thresholds {low}/{high})");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_step(w: usize, h: usize, split: usize) -> GrayImageU8 {
        let mut img = GrayImageU8::new(w, h);
        for y in 0..h {
            for x in split..w {
                img.set(x, y, 255);
            }
        }
        img
    }

    #[test]
    fn uniform_image_has_no_edges() {
        let img = GrayImageU8::filled(16, 16, 200);
        let edges = canny(&img, 10.0, 150.0);
        assert!(edges.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn step_edge_is_detected_along_the_split() {
        let img = vertical_step(16, 16, 8);
        let edges = canny(&img, 10.0, 150.0);
        let mut cols_with_edges = std::collections::BTreeSet::new();
        for y in 1..15 {
            for x in 1..15 {
                if edges.get(x, y) != 0 {
                    cols_with_edges.insert(x);
                }
            }
        }
        assert!(!cols_with_edges.is_empty(), "expected an edge response");
        assert!(
            cols_with_edges.iter().all(|&x| (7..=8).contains(&x)),
            "edges should hug the step: {cols_with_edges:?}"
        );
    }

    #[test]
    fn high_threshold_gates_weak_responses() {
        // step of height 20: Sobel L1 response is 80 at the transition
        let mut img = GrayImageU8::new(16, 16);
        for y in 0..16 {
            for x in 8..16 {
                img.set(x, y, 20);
            }
        }
        let edges = canny(&img, 10.0, 500.0);
        assert!(edges.as_slice().iter().all(|&v| v == 0));
        let edges = canny(&img, 10.0, 50.0);
        assert!(edges.as_slice().iter().any(|&v| v != 0));
    }
}
