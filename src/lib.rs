#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod engine;
pub mod error;
pub mod image;
pub mod labels;
pub mod palette;
pub mod pipeline;
pub mod refine;
pub mod remap;
pub mod tensor;
pub mod transform;

// --- High-level re-exports -------------------------------------------------

// Main entry points: engine, refiner, and the one-call pipeline.
pub use crate::engine::{Segmentation, SegmentationEngine, SegmentationModel};
pub use crate::pipeline::{extract_character_mask, CharacterMask, PipelineParams};
pub use crate::refine::{refine_mask, RefineParams};

// Error taxonomy.
pub use crate::error::{
    InferenceError, InvalidScaleError, PipelineError, ResolutionMismatchError, ShapeMismatchError,
    UnmappedLabelError,
};

// Convenience helpers that are generally useful.
pub use crate::palette::{build_palette, class_color};
pub use crate::remap::remap_logits;

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::{GrayImageU8, RgbImageU8};
    pub use crate::labels::{LabelMask, LabelScheme};
    pub use crate::transform::CropTransform;
    pub use crate::{
        extract_character_mask, refine_mask, PipelineParams, RefineParams, SegmentationEngine,
        SegmentationModel,
    };
}
