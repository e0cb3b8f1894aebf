//! Projects model-space logits back onto the original image's pixel grid.
//!
//! For every pixel of the original image, the forward crop transform gives
//! its coordinate in the fixed square model space; the logit volume is
//! bilinearly sampled there. Taps falling outside the model grid contribute
//! a zero score in every channel, so argmax with first-index tie-breaking
//! resolves such pixels to class 0 (background).
//!
//! The transform pair must be numerically exact inverses; see
//! [`crate::transform`]. This stage is where orientation or half-pixel
//! errors become visible as shifted part boundaries.

use crate::error::ShapeMismatchError;
use crate::tensor::LogitVolume;
use crate::transform::{apply_affine, CropTransform};
use log::debug;
use rayon::prelude::*;

/// Resample `logits` (shape `input_size × C`) onto the original image grid
/// described by `transform`, producing a
/// `(transform.height, transform.width, C)` volume.
pub fn remap_logits(
    logits: &LogitVolume,
    transform: &CropTransform,
    input_size: (usize, usize),
) -> Result<LogitVolume, ShapeMismatchError> {
    let (in_h, in_w) = input_size;
    if logits.height() != in_h || logits.width() != in_w {
        return Err(ShapeMismatchError {
            context: "remap input",
            expected: [in_h, in_w, logits.channels()],
            found: logits.shape(),
        });
    }

    let channels = logits.channels();
    let out_w = transform.width;
    let out_h = transform.height;
    let fwd = transform.to_model(input_size);
    debug!(
        "remap_logits: {}x{}x{} -> {}x{}x{}",
        in_h, in_w, channels, out_h, out_w, channels
    );

    let mut out = LogitVolume::new(out_h, out_w, channels);
    let row_len = out_w * channels;
    out.as_mut_slice()
        .par_chunks_mut(row_len.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..out_w {
                let m = apply_affine(&fwd, [x as f32, y as f32]);
                let dst = &mut row[x * channels..(x + 1) * channels];
                sample_bilinear(logits, m[0], m[1], dst);
            }
        });
    Ok(out)
}

/// Bilinear sample of every channel at (x, y) in model space. Taps outside
/// the grid read as zero (border-constant semantics).
fn sample_bilinear(logits: &LogitVolume, x: f32, y: f32, dst: &mut [f32]) {
    let w = logits.width() as isize;
    let h = logits.height() as isize;
    let xf = x.floor();
    let yf = y.floor();
    let x0 = xf as isize;
    let y0 = yf as isize;
    let tx = x - xf;
    let ty = y - yf;

    // Entirely outside: every tap is zero.
    if x0 + 1 < 0 || y0 + 1 < 0 || x0 >= w || y0 >= h {
        dst.fill(0.0);
        return;
    }

    let weights = [
        ((x0, y0), (1.0 - tx) * (1.0 - ty)),
        ((x0 + 1, y0), tx * (1.0 - ty)),
        ((x0, y0 + 1), (1.0 - tx) * ty),
        ((x0 + 1, y0 + 1), tx * ty),
    ];
    dst.fill(0.0);
    for &((sx, sy), weight) in &weights {
        if weight == 0.0 || sx < 0 || sy < 0 || sx >= w || sy >= h {
            continue;
        }
        let scores = logits.scores_at(sy as usize, sx as usize);
        for (d, &s) in dst.iter_mut().zip(scores) {
            *d += weight * s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_transform(size: usize) -> CropTransform {
        // Box spanning the model grid one-to-one.
        CropTransform {
            center: [size as f32 * 0.5, size as f32 * 0.5],
            scale: [size as f32, size as f32],
            width: size,
            height: size,
        }
    }

    #[test]
    fn identity_crop_preserves_scores() {
        let size = 8;
        let mut logits = LogitVolume::new(size, size, 2);
        for y in 0..size {
            for x in 0..size {
                logits.set(y, x, 0, (y * size + x) as f32);
                logits.set(y, x, 1, 1.0);
            }
        }
        let out = remap_logits(&logits, &identity_transform(size), (size, size)).unwrap();
        assert_eq!(out.shape(), [size, size, 2]);
        for y in 0..size {
            for x in 0..size {
                assert!((out.get(y, x, 0) - (y * size + x) as f32).abs() < 1e-4);
                assert!((out.get(y, x, 1) - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn out_of_crop_pixels_read_zero() {
        // Crop covers only the left half of a wide image; far-right pixels
        // map outside the model grid and must read zero in every channel.
        let transform = CropTransform {
            center: [4.0, 4.0],
            scale: [8.0, 8.0],
            width: 32,
            height: 8,
        };
        let mut logits = LogitVolume::new(8, 8, 3);
        logits.as_mut_slice().fill(5.0);
        let out = remap_logits(&logits, &transform, (8, 8)).unwrap();
        for c in 0..3 {
            assert_eq!(out.get(4, 31, c), 0.0);
        }
        assert!((out.get(4, 4, 0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let logits = LogitVolume::new(8, 8, 2);
        let err = remap_logits(&logits, &identity_transform(8), (16, 16)).unwrap_err();
        assert_eq!(err.context, "remap input");
        assert_eq!(err.found, [8, 8, 2]);
    }
}
