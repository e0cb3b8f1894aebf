//! End-to-end orchestration: segment, align on the prior's grid, refine.
//!
//! One image is processed synchronously from photo to final mask; no state
//! survives between calls. Batch parallelism belongs to the caller (one
//! model per worker, or a model known to be safe for concurrent read-only
//! inference).

use crate::engine::{SegmentationEngine, SegmentationModel};
use crate::error::PipelineError;
use crate::image::{resize_bilinear_rgb, GrayImageU8, RgbImageU8};
use crate::labels::{LabelMask, LabelScheme, RemapTable};
use crate::refine::{refine_mask, RefineParams};
use crate::transform::CropTransform;
use log::debug;
use std::time::Instant;

/// Configuration of the whole pipeline.
#[derive(Clone, Debug)]
pub struct PipelineParams {
    pub scheme: LabelScheme,
    /// Optional fine-to-coarse label reduction applied after argmax.
    pub remap_table: Option<RemapTable>,
    pub refine: RefineParams,
}

impl PipelineParams {
    pub fn new(scheme: LabelScheme) -> Self {
        Self {
            scheme,
            remap_table: None,
            refine: RefineParams::default(),
        }
    }
}

/// Everything the pipeline produces for one image.
#[derive(Clone, Debug)]
pub struct CharacterMask {
    /// Per-pixel labels on the original image grid.
    pub labels: LabelMask,
    /// Palette-encoded visualization of `labels`.
    pub visualization: RgbImageU8,
    /// Final binary {0, 255} mask on the prior's grid.
    pub mask: GrayImageU8,
    pub segment_ms: f64,
    pub refine_ms: f64,
}

/// Run segmentation and edge-guided refinement for one image.
///
/// `pose` and the parsing visualization are resampled onto `prior`'s grid
/// before fusion; the returned label mask stays at the photo's resolution.
pub fn extract_character_mask<M: SegmentationModel + ?Sized>(
    photo: &RgbImageU8,
    transform: &CropTransform,
    pose: &RgbImageU8,
    prior: &GrayImageU8,
    model: &M,
    params: &PipelineParams,
) -> Result<CharacterMask, PipelineError> {
    let mut engine = SegmentationEngine::new(params.scheme);
    if let Some(table) = &params.remap_table {
        engine = engine.with_remap_table(table.clone());
    }

    let segment_start = Instant::now();
    let segmentation = engine.segment(photo, transform, model)?;
    let segment_ms = segment_start.elapsed().as_secs_f64() * 1000.0;

    let refine_start = Instant::now();
    let parsing_aligned =
        resize_bilinear_rgb(&segmentation.visualization, prior.width(), prior.height());
    let pose_aligned = resize_bilinear_rgb(pose, prior.width(), prior.height());
    let mask = refine_mask(prior, &parsing_aligned, &pose_aligned, &params.refine)?;
    let refine_ms = refine_start.elapsed().as_secs_f64() * 1000.0;

    debug!("extract_character_mask: segment {segment_ms:.3} ms, refine {refine_ms:.3} ms");
    Ok(CharacterMask {
        labels: segmentation.labels,
        visualization: segmentation.visualization,
        mask,
        segment_ms,
        refine_ms,
    })
}
