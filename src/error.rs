//! Error taxonomy shared by the pipeline stages.
//!
//! Every error here is unrecoverable at the point of detection: the core
//! never substitutes a fallback value. Callers decide whether to skip the
//! image, log, or abort the batch.

use std::fmt;

/// Image or tensor dimensions disagree with a component's stated contract.
///
/// Shapes are reported as `[height, width, channels]`; single-channel data
/// uses `channels = 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeMismatchError {
    /// Which contract was violated (e.g. `"crop transform"`, `"model output"`).
    pub context: &'static str,
    pub expected: [usize; 3],
    pub found: [usize; 3],
}

impl fmt::Display for ShapeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape mismatch in {}: expected {}x{}x{}, found {}x{}x{}",
            self.context,
            self.expected[0],
            self.expected[1],
            self.expected[2],
            self.found[0],
            self.found[1],
            self.found[2]
        )
    }
}

impl std::error::Error for ShapeMismatchError {}

/// A crop transform carries a non-positive scale component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidScaleError {
    pub scale: [f32; 2],
}

impl fmt::Display for InvalidScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "crop scale must be strictly positive, got ({}, {})",
            self.scale[0], self.scale[1]
        )
    }
}

impl std::error::Error for InvalidScaleError {}

/// A label mask contained a class id outside a remap table's domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnmappedLabelError {
    pub label: u8,
}

impl fmt::Display for UnmappedLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label {} has no entry in the remap table", self.label)
    }
}

impl std::error::Error for UnmappedLabelError {}

/// The injected model call failed or returned malformed output.
#[derive(Clone, Debug, PartialEq)]
pub enum InferenceError {
    /// The underlying forward pass reported a failure.
    Model { message: String },
    /// The forward pass returned a volume violating the declared contract.
    MalformedOutput(ShapeMismatchError),
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::Model { message } => write!(f, "model forward pass failed: {message}"),
            InferenceError::MalformedOutput(err) => write!(f, "malformed model output: {err}"),
        }
    }
}

impl std::error::Error for InferenceError {}

/// Refinement inputs differ in size and the caller did not pre-resample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionMismatchError {
    /// Which refinement input is off-grid (`"parsing"` or `"pose"`).
    pub input: &'static str,
    /// Expected (width, height), i.e. the prior mask's grid.
    pub expected: (usize, usize),
    pub found: (usize, usize),
}

impl fmt::Display for ResolutionMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} image is {}x{} but the prior mask grid is {}x{}; resample before refinement",
            self.input, self.found.0, self.found.1, self.expected.0, self.expected.1
        )
    }
}

impl std::error::Error for ResolutionMismatchError {}

/// Sum of the stage errors, returned by the high-level orchestration.
#[derive(Clone, Debug)]
pub enum PipelineError {
    Shape(ShapeMismatchError),
    InvalidScale(InvalidScaleError),
    UnmappedLabel(UnmappedLabelError),
    Inference(InferenceError),
    Resolution(ResolutionMismatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Shape(err) => err.fmt(f),
            PipelineError::InvalidScale(err) => err.fmt(f),
            PipelineError::UnmappedLabel(err) => err.fmt(f),
            PipelineError::Inference(err) => err.fmt(f),
            PipelineError::Resolution(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Shape(err) => Some(err),
            PipelineError::InvalidScale(err) => Some(err),
            PipelineError::UnmappedLabel(err) => Some(err),
            PipelineError::Inference(err) => Some(err),
            PipelineError::Resolution(err) => Some(err),
        }
    }
}

impl From<ShapeMismatchError> for PipelineError {
    fn from(err: ShapeMismatchError) -> Self {
        PipelineError::Shape(err)
    }
}

impl From<InvalidScaleError> for PipelineError {
    fn from(err: InvalidScaleError) -> Self {
        PipelineError::InvalidScale(err)
    }
}

impl From<UnmappedLabelError> for PipelineError {
    fn from(err: UnmappedLabelError) -> Self {
        PipelineError::UnmappedLabel(err)
    }
}

impl From<InferenceError> for PipelineError {
    fn from(err: InferenceError) -> Self {
        PipelineError::Inference(err)
    }
}

impl From<ResolutionMismatchError> for PipelineError {
    fn from(err: ResolutionMismatchError) -> Self {
        PipelineError::Resolution(err)
    }
}
