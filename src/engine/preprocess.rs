//! Preprocessing: warp the photo into model space and normalize.

use crate::error::ShapeMismatchError;
use crate::image::RgbImageU8;
use crate::tensor::TensorF32;
use crate::transform::{apply_affine, CropTransform};

/// Per-channel normalization constants of the pretrained weights. The
/// channel order is a given of the weight checkpoint and is preserved
/// verbatim, even though it does not match the usual RGB convention.
pub const NORM_MEAN: [f32; 3] = [0.406, 0.456, 0.485];
pub const NORM_STD: [f32; 3] = [0.225, 0.224, 0.229];

/// Warp `image` into the model's square input space using the inverse crop
/// transform (bilinear, border-constant zero), then normalize each channel
/// as `(v / 255 - mean) / std` into a planar CHW tensor.
pub fn preprocess(
    image: &RgbImageU8,
    transform: &CropTransform,
    input_size: (usize, usize),
) -> Result<TensorF32, ShapeMismatchError> {
    if image.width() != transform.width || image.height() != transform.height {
        return Err(ShapeMismatchError {
            context: "crop transform",
            expected: [transform.height, transform.width, 3],
            found: [image.height(), image.width(), 3],
        });
    }

    let (in_h, in_w) = input_size;
    let inv = transform.to_image(input_size);
    let mut tensor = TensorF32::new(3, in_h, in_w);
    for y in 0..in_h {
        for x in 0..in_w {
            let p = apply_affine(&inv, [x as f32, y as f32]);
            let rgb = sample_rgb(image, p[0], p[1]);
            for c in 0..3 {
                let v = rgb[c] / 255.0;
                tensor.set(c, y, x, (v - NORM_MEAN[c]) / NORM_STD[c]);
            }
        }
    }
    Ok(tensor)
}

/// Bilinear RGB sample with taps outside the image reading zero.
fn sample_rgb(image: &RgbImageU8, x: f32, y: f32) -> [f32; 3] {
    let w = image.width() as isize;
    let h = image.height() as isize;
    let xf = x.floor();
    let yf = y.floor();
    let x0 = xf as isize;
    let y0 = yf as isize;
    let tx = x - xf;
    let ty = y - yf;

    let mut out = [0.0f32; 3];
    if x0 + 1 < 0 || y0 + 1 < 0 || x0 >= w || y0 >= h {
        return out;
    }
    let taps = [
        ((x0, y0), (1.0 - tx) * (1.0 - ty)),
        ((x0 + 1, y0), tx * (1.0 - ty)),
        ((x0, y0 + 1), (1.0 - tx) * ty),
        ((x0 + 1, y0 + 1), tx * ty),
    ];
    for &((sx, sy), weight) in &taps {
        if weight == 0.0 || sx < 0 || sy < 0 || sx >= w || sy >= h {
            continue;
        }
        let rgb = image.pixel(sx as usize, sy as usize);
        for c in 0..3 {
            out[c] += weight * rgb[c] as f32;
        }
    }
    out
}
