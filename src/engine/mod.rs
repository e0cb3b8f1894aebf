//! Segmentation engine: one forward pass, coordinate-correct remapping,
//! label reduction, and palette visualization.
//!
//! The engine owns no model. Anything implementing [`SegmentationModel`]
//! (a real network binding, a replay cache, a stub) plugs in, as long as it
//! is a deterministic function of its input and honors its declared input
//! contract.
//!
//! Stages of [`SegmentationEngine::segment`], in order:
//!
//! 1. Validate the crop scale (strictly positive) and the model's declared
//!    input contract.
//! 2. Warp + normalize the photo into the model input tensor.
//! 3. `model.forward`.
//! 4. Upsample raw logits to the declared input resolution (bilinear,
//!    corner-aligned, the same convention the remapper inverts).
//! 5. Project logits onto the original image grid.
//! 6. Per-pixel argmax (first index wins ties, so zero-filled border
//!    pixels resolve to background).
//! 7. Optional coarse-label reduction.
//! 8. Palette-encode the mask for visualization.
//!
//! Any failure propagates before outputs are produced; there are no
//! partial writes.

pub mod preprocess;

pub use preprocess::{preprocess, NORM_MEAN, NORM_STD};

use crate::error::{InferenceError, PipelineError, ShapeMismatchError};
use crate::image::RgbImageU8;
use crate::labels::{reduce_labels, LabelMask, LabelScheme, RemapTable};
use crate::palette::colorize_labels;
use crate::remap::remap_logits;
use crate::tensor::{LogitVolume, TensorF32};
use crate::transform::CropTransform;
use log::debug;

/// Capability required of an injected segmentation model.
pub trait SegmentationModel {
    /// Expected input resolution as `(height, width)`.
    fn input_size(&self) -> (usize, usize);

    /// Expected input channel count.
    fn input_channels(&self) -> usize {
        3
    }

    /// One forward pass. Must be a deterministic function of `input` and
    /// may return logits at a lower resolution than the input; the engine
    /// upsamples. Implementations report failures as
    /// [`InferenceError::Model`].
    fn forward(&self, input: &TensorF32) -> Result<LogitVolume, InferenceError>;
}

/// Stub model emitting all-zero logits (everything argmaxes to background).
/// Useful for wiring tests and demos without weights.
pub struct UniformModel {
    input_size: (usize, usize),
    num_classes: usize,
}

impl UniformModel {
    pub fn new(input_size: (usize, usize), num_classes: usize) -> Self {
        Self {
            input_size,
            num_classes,
        }
    }
}

impl SegmentationModel for UniformModel {
    fn input_size(&self) -> (usize, usize) {
        self.input_size
    }

    fn forward(&self, input: &TensorF32) -> Result<LogitVolume, InferenceError> {
        Ok(LogitVolume::new(
            input.height(),
            input.width(),
            self.num_classes,
        ))
    }
}

/// Label mask plus its palette-encoded visualization, both on the original
/// image's pixel grid.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub labels: LabelMask,
    pub visualization: RgbImageU8,
}

/// Orchestrates a single segmentation pass per image. Holds only
/// configuration; safe to reuse across images.
#[derive(Clone, Debug)]
pub struct SegmentationEngine {
    scheme: LabelScheme,
    remap_table: Option<RemapTable>,
}

impl SegmentationEngine {
    pub fn new(scheme: LabelScheme) -> Self {
        Self {
            scheme,
            remap_table: None,
        }
    }

    /// Reduce argmax labels through `table` before visualization.
    pub fn with_remap_table(mut self, table: RemapTable) -> Self {
        self.remap_table = Some(table);
        self
    }

    pub fn scheme(&self) -> LabelScheme {
        self.scheme
    }

    /// Run the full segmentation stage for one image.
    pub fn segment<M: SegmentationModel + ?Sized>(
        &self,
        image: &RgbImageU8,
        transform: &CropTransform,
        model: &M,
    ) -> Result<Segmentation, PipelineError> {
        transform.validate()?;
        let input_size = self.scheme.input_size();
        if model.input_size() != input_size || model.input_channels() != 3 {
            let (mh, mw) = model.input_size();
            return Err(ShapeMismatchError {
                context: "model input contract",
                expected: [input_size.0, input_size.1, 3],
                found: [mh, mw, model.input_channels()],
            }
            .into());
        }

        let tensor = preprocess(image, transform, input_size)?;
        let raw = model.forward(&tensor).map_err(PipelineError::Inference)?;
        debug!(
            "SegmentationEngine::segment raw logits {}x{}x{}",
            raw.height(),
            raw.width(),
            raw.channels()
        );
        if raw.channels() != self.scheme.num_classes() || raw.height() == 0 || raw.width() == 0 {
            return Err(InferenceError::MalformedOutput(ShapeMismatchError {
                context: "model output",
                expected: [input_size.0, input_size.1, self.scheme.num_classes()],
                found: raw.shape(),
            })
            .into());
        }

        let upsampled = upsample_logits(&raw, input_size);
        let remapped = remap_logits(&upsampled, transform, input_size)?;
        let mut labels = argmax_labels(&remapped);
        if let Some(table) = &self.remap_table {
            labels = reduce_labels(&labels, table)?;
        }
        let visualization = colorize_labels(&labels);
        Ok(Segmentation {
            labels,
            visualization,
        })
    }
}

/// Bilinear upsample with corners aligned: output pixel `i` samples the
/// source at `i * (src_dim - 1) / (dst_dim - 1)`. This matches the
/// convention of the crop transform, so boundaries do not drift.
pub fn upsample_logits(src: &LogitVolume, size: (usize, usize)) -> LogitVolume {
    let (dst_h, dst_w) = size;
    if src.height() == dst_h && src.width() == dst_w {
        return src.clone();
    }
    let channels = src.channels();
    let mut out = LogitVolume::new(dst_h, dst_w, channels);
    if src.height() == 0 || src.width() == 0 || dst_h == 0 || dst_w == 0 {
        return out;
    }
    let step_y = corner_step(src.height(), dst_h);
    let step_x = corner_step(src.width(), dst_w);
    for y in 0..dst_h {
        let sy = y as f32 * step_y;
        let y0 = (sy.floor() as usize).min(src.height() - 1);
        let y1 = (y0 + 1).min(src.height() - 1);
        let ty = sy - y0 as f32;
        for x in 0..dst_w {
            let sx = x as f32 * step_x;
            let x0 = (sx.floor() as usize).min(src.width() - 1);
            let x1 = (x0 + 1).min(src.width() - 1);
            let tx = sx - x0 as f32;

            let s00 = src.scores_at(y0, x0);
            let s10 = src.scores_at(y0, x1);
            let s01 = src.scores_at(y1, x0);
            let s11 = src.scores_at(y1, x1);
            let dst = out.scores_at_mut(y, x);
            for c in 0..channels {
                let top = s00[c] * (1.0 - tx) + s10[c] * tx;
                let bottom = s01[c] * (1.0 - tx) + s11[c] * tx;
                dst[c] = top * (1.0 - ty) + bottom * ty;
            }
        }
    }
    out
}

fn corner_step(src_dim: usize, dst_dim: usize) -> f32 {
    if src_dim > 1 && dst_dim > 1 {
        (src_dim - 1) as f32 / (dst_dim - 1) as f32
    } else {
        0.0
    }
}

/// Per-pixel argmax over channels; the first maximal index wins ties.
pub fn argmax_labels(logits: &LogitVolume) -> LabelMask {
    let mut mask = LabelMask::new(logits.width(), logits.height());
    for y in 0..logits.height() {
        for x in 0..logits.width() {
            let scores = logits.scores_at(y, x);
            let mut best = 0usize;
            let mut best_score = scores[0];
            for (c, &s) in scores.iter().enumerate().skip(1) {
                if s > best_score {
                    best = c;
                    best_score = s;
                }
            }
            mask.set(x, y, best as u8);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_breaks_ties_toward_background() {
        let mut vol = LogitVolume::new(1, 2, 3);
        // pixel 0: all equal -> class 0; pixel 1: class 2 wins
        vol.scores_at_mut(0, 1).copy_from_slice(&[0.0, 1.0, 2.0]);
        let mask = argmax_labels(&vol);
        assert_eq!(mask.get(0, 0), 0);
        assert_eq!(mask.get(1, 0), 2);
    }

    #[test]
    fn upsample_preserves_corners() {
        let mut src = LogitVolume::new(2, 2, 1);
        src.set(0, 0, 0, 1.0);
        src.set(0, 1, 0, 3.0);
        src.set(1, 0, 0, 5.0);
        src.set(1, 1, 0, 7.0);
        let up = upsample_logits(&src, (5, 5));
        assert!((up.get(0, 0, 0) - 1.0).abs() < 1e-5);
        assert!((up.get(0, 4, 0) - 3.0).abs() < 1e-5);
        assert!((up.get(4, 0, 0) - 5.0).abs() < 1e-5);
        assert!((up.get(4, 4, 0) - 7.0).abs() < 1e-5);
        // center is the mean of the four corners under corner alignment
        assert!((up.get(2, 2, 0) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn upsample_handles_degenerate_volumes() {
        let empty = LogitVolume::new(0, 0, 2);
        let up = upsample_logits(&empty, (3, 3));
        assert_eq!(up.shape(), [3, 3, 2]);
        assert!(up.as_slice().iter().all(|&v| v == 0.0));

        let mut single = LogitVolume::new(1, 1, 1);
        single.set(0, 0, 0, 5.0);
        let up = upsample_logits(&single, (2, 4));
        assert_eq!(up.shape(), [2, 4, 1]);
        assert!(up.as_slice().iter().all(|&v| (v - 5.0).abs() < 1e-6));
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let engine = SegmentationEngine::new(LabelScheme::Pascal);
        let model = UniformModel::new((512, 512), 7);
        let image = RgbImageU8::new(16, 16);
        let transform = CropTransform {
            center: [8.0, 8.0],
            scale: [0.0, 16.0],
            width: 16,
            height: 16,
        };
        let err = engine.segment(&image, &transform, &model).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidScale(_)));
    }

    #[test]
    fn model_contract_mismatch_is_rejected() {
        let engine = SegmentationEngine::new(LabelScheme::Pascal);
        let model = UniformModel::new((128, 128), 7); // wrong resolution
        let image = RgbImageU8::new(64, 64);
        let transform = CropTransform::full_image(64, 64, (512, 512));
        let err = engine.segment(&image, &transform, &model).unwrap_err();
        assert!(matches!(err, PipelineError::Shape(_)));
    }

    #[test]
    fn wrong_class_count_is_an_inference_error() {
        // Declares the Pascal resolution but emits 3 channels instead of 7.
        struct BadModel;
        impl SegmentationModel for BadModel {
            fn input_size(&self) -> (usize, usize) {
                (512, 512)
            }
            fn forward(&self, input: &TensorF32) -> Result<LogitVolume, InferenceError> {
                Ok(LogitVolume::new(input.height() / 4, input.width() / 4, 3))
            }
        }
        let engine = SegmentationEngine::new(LabelScheme::Pascal);
        let image = RgbImageU8::new(16, 16);
        let transform = CropTransform::full_image(16, 16, (512, 512));
        let err = engine.segment(&image, &transform, &BadModel).unwrap_err();
        match err {
            PipelineError::Inference(InferenceError::MalformedOutput(shape)) => {
                assert_eq!(shape.context, "model output");
            }
            other => panic!("expected malformed output error, got {other:?}"),
        }
    }

    #[test]
    fn model_failure_propagates() {
        struct FailingModel;
        impl SegmentationModel for FailingModel {
            fn input_size(&self) -> (usize, usize) {
                (512, 512)
            }
            fn forward(&self, _input: &TensorF32) -> Result<LogitVolume, InferenceError> {
                Err(InferenceError::Model {
                    message: "device lost".into(),
                })
            }
        }
        let engine = SegmentationEngine::new(LabelScheme::Pascal);
        let image = RgbImageU8::new(16, 16);
        let transform = CropTransform::full_image(16, 16, (512, 512));
        let err = engine
            .segment(&image, &transform, &FailingModel)
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Inference(InferenceError::Model { .. })
        ));
    }
}
