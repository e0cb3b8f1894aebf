//! Crop transform between the original image and the model's square input.
//!
//! The dataset loader crops a person-centered box out of the original image
//! and resizes it to the model's fixed input resolution. [`CropTransform`]
//! records that box (center + extent in original pixels) so logits can be
//! projected back onto the original pixel grid.
//!
//! Both directions are exact inverses of each other; a flip or off-by-one
//! here shows up as visibly misaligned part boundaries downstream.

use crate::error::InvalidScaleError;
use nalgebra::{Matrix3, Vector3};

/// Affine crop parameters supplied by the dataset loader.
///
/// `scale` is the crop box extent in original-image pixels; its aspect ratio
/// matches the model input's, so the mapping is a uniform scale plus
/// translation. Scale components must be strictly positive.
#[derive(Clone, Copy, Debug)]
pub struct CropTransform {
    /// Crop box center in original-image pixel coordinates.
    pub center: [f32; 2],
    /// Crop box extent (width, height) in original-image pixels.
    pub scale: [f32; 2],
    /// Original image width in pixels.
    pub width: usize,
    /// Original image height in pixels.
    pub height: usize,
}

impl CropTransform {
    /// Crop box covering the whole image, inflated to the model input's
    /// aspect ratio (the standard person-box heuristic when no detector
    /// output is available). `input_size` is `(height, width)`.
    pub fn full_image(width: usize, height: usize, input_size: (usize, usize)) -> Self {
        let (in_h, in_w) = input_size;
        let aspect = in_w as f32 / in_h as f32;
        let mut box_w = (width.saturating_sub(1)) as f32;
        let mut box_h = (height.saturating_sub(1)) as f32;
        let center = [box_w * 0.5, box_h * 0.5];
        if box_w > aspect * box_h {
            box_h = box_w / aspect;
        } else if box_w < aspect * box_h {
            box_w = box_h * aspect;
        }
        Self {
            center,
            scale: [box_w.max(1.0), box_h.max(1.0)],
            width,
            height,
        }
    }

    /// Check the one invariant the pipeline enforces: strictly positive
    /// scale (NaN scales fail too). Center placement is the dataset
    /// loader's contract and is not checked here.
    pub fn validate(&self) -> Result<(), InvalidScaleError> {
        if self.scale[0] > 0.0 && self.scale[1] > 0.0 {
            Ok(())
        } else {
            Err(InvalidScaleError { scale: self.scale })
        }
    }

    /// Affine map from original-image coordinates to model-input coordinates:
    /// translate by `-center`, scale by `input_size / scale`, then translate
    /// so the box center lands at `input_size / 2`.
    pub fn to_model(&self, input_size: (usize, usize)) -> Matrix3<f32> {
        let (in_h, in_w) = input_size;
        let sx = in_w as f32 / self.scale[0];
        let sy = in_h as f32 / self.scale[1];
        Matrix3::new(
            sx,
            0.0,
            0.5 * in_w as f32 - self.center[0] * sx,
            0.0,
            sy,
            0.5 * in_h as f32 - self.center[1] * sy,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Exact inverse of [`to_model`](Self::to_model): model-input
    /// coordinates back to original-image coordinates.
    pub fn to_image(&self, input_size: (usize, usize)) -> Matrix3<f32> {
        let (in_h, in_w) = input_size;
        let sx = self.scale[0] / in_w as f32;
        let sy = self.scale[1] / in_h as f32;
        Matrix3::new(
            sx,
            0.0,
            self.center[0] - 0.5 * in_w as f32 * sx,
            0.0,
            sy,
            self.center[1] - 0.5 * in_h as f32 * sy,
            0.0,
            0.0,
            1.0,
        )
    }
}

/// Apply an affine matrix (last row `[0, 0, 1]`) to a pixel coordinate.
#[inline]
pub fn apply_affine(m: &Matrix3<f32>, p: [f32; 2]) -> [f32; 2] {
    let v = m * Vector3::new(p[0], p[1], 1.0);
    [v[0], v[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_inverse_compose_to_identity() {
        let t = CropTransform {
            center: [120.0, 85.5],
            scale: [250.0, 250.0],
            width: 240,
            height: 180,
        };
        let fwd = t.to_model((473, 473));
        let inv = t.to_image((473, 473));
        for &p in &[[0.0, 0.0], [239.0, 179.0], [120.0, 85.5], [33.3, 71.2]] {
            let q = apply_affine(&inv, apply_affine(&fwd, p));
            assert!((q[0] - p[0]).abs() < 1e-3, "x drift: {} vs {}", q[0], p[0]);
            assert!((q[1] - p[1]).abs() < 1e-3, "y drift: {} vs {}", q[1], p[1]);
        }
    }

    #[test]
    fn box_center_maps_to_input_center() {
        let t = CropTransform {
            center: [50.0, 40.0],
            scale: [100.0, 100.0],
            width: 100,
            height: 80,
        };
        let m = apply_affine(&t.to_model((512, 512)), t.center);
        assert!((m[0] - 256.0).abs() < 1e-4);
        assert!((m[1] - 256.0).abs() < 1e-4);
    }

    #[test]
    fn full_image_matches_input_aspect() {
        let t = CropTransform::full_image(200, 100, (512, 512));
        assert!((t.scale[0] / t.scale[1] - 1.0).abs() < 1e-5);
        assert!(t.validate().is_ok());
        // wide image: height inflated, width kept
        assert!((t.scale[0] - 199.0).abs() < 1e-4);
        assert!((t.scale[1] - 199.0).abs() < 1e-4);
    }

    #[test]
    fn validate_rejects_non_positive_scale() {
        let t = CropTransform {
            center: [10.0, 10.0],
            scale: [0.0, 5.0],
            width: 20,
            height: 20,
        };
        let err = t.validate().unwrap_err();
        assert_eq!(err.scale, [0.0, 5.0]);
        let nan = CropTransform {
            scale: [f32::NAN, 5.0],
            ..t
        };
        assert!(nan.validate().is_err());
    }
}
