//! Grayscale morphology: square-kernel dilation.

use crate::image::GrayImageU8;

/// Dilate with a square structuring element of side `kernel`, anchored at
/// `kernel / 2`. `kernel <= 1` is the identity. Window taps outside the
/// image are ignored, so borders never shrink the response.
pub fn dilate(src: &GrayImageU8, kernel: usize) -> GrayImageU8 {
    if kernel <= 1 {
        return src.clone();
    }
    let w = src.width();
    let h = src.height();
    if w == 0 || h == 0 {
        return src.clone();
    }
    let anchor = kernel / 2;

    // Separable: the square-element max splits into a horizontal and a
    // vertical running max.
    let mut horizontal = GrayImageU8::new(w, h);
    for y in 0..h {
        let src_row = src.row(y);
        let dst_row = horizontal.row_mut(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            let lo = x.saturating_sub(anchor);
            let hi = (x + kernel - anchor).min(w);
            *dst = src_row[lo..hi].iter().copied().max().unwrap_or(0);
        }
    }

    let mut out = GrayImageU8::new(w, h);
    for y in 0..h {
        let lo = y.saturating_sub(anchor);
        let hi = (y + kernel - anchor).min(h);
        let dst_row = out.row_mut(y);
        for yy in lo..hi {
            let row = horizontal.row(yy);
            for (dst, &v) in dst_row.iter_mut().zip(row) {
                if v > *dst {
                    *dst = v;
                }
            }
        }
    }
    out
}
