//! Edge-guided mask refinement.
//!
//! Fuses three same-resolution inputs into the final binary character mask:
//!
//! - the rough **prior** mask (starting point),
//! - the **parsing** visualization, whose part boundaries become erase
//!   bands after hysteresis edge detection and dilation,
//! - the **pose** skeleton image, whose dilated silhouette is filled back
//!   in last.
//!
//! Precedence is load-bearing and exactly: *pose-fill overrides edge-erase,
//! which overrides the prior*. The erase pass runs strictly before the fill
//! pass; swapping them changes every pixel where the two regions overlap.
//!
//! The refiner does not resample. Callers align all inputs on the prior's
//! grid first (see [`crate::image::resize`]) or get a
//! [`ResolutionMismatchError`].

pub mod canny;
pub mod morph;

pub use canny::canny;
pub use morph::dilate;

use crate::error::ResolutionMismatchError;
use crate::image::{GrayImageU8, RgbImageU8};
use log::debug;

/// Knobs of the refinement stage.
#[derive(Clone, Copy, Debug)]
pub struct RefineParams {
    /// Hysteresis low threshold on the 8-bit Sobel L1 response.
    pub edge_low: f32,
    /// Hysteresis high threshold on the 8-bit Sobel L1 response.
    pub edge_high: f32,
    /// Side of the square element dilating the edge bands. Materially
    /// larger than `pose_dilate` so edge bands fully erase mis-segmented
    /// pixels adjoining a part boundary.
    pub edge_dilate: usize,
    /// Side of the square element thickening the pose skeleton strokes.
    pub pose_dilate: usize,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            edge_low: 10.0,
            edge_high: 150.0,
            edge_dilate: 20,
            pose_dilate: 10,
        }
    }
}

/// Final mask plus the intermediate maps, for debugging dumps.
#[derive(Clone, Debug)]
pub struct RefineArtifacts {
    /// Binary {0, 255} output mask on the prior's grid.
    pub mask: GrayImageU8,
    /// Dilated part-boundary edge bands.
    pub edges: GrayImageU8,
    /// Dilated pose silhouette.
    pub pose_silhouette: GrayImageU8,
}

/// Refine `prior` using part boundaries from `parsing` and the silhouette
/// of `pose`. All three must share the prior's resolution.
pub fn refine_mask(
    prior: &GrayImageU8,
    parsing: &RgbImageU8,
    pose: &RgbImageU8,
    params: &RefineParams,
) -> Result<GrayImageU8, ResolutionMismatchError> {
    refine_mask_detailed(prior, parsing, pose, params).map(|artifacts| artifacts.mask)
}

/// Like [`refine_mask`] but also returns the intermediate maps.
pub fn refine_mask_detailed(
    prior: &GrayImageU8,
    parsing: &RgbImageU8,
    pose: &RgbImageU8,
    params: &RefineParams,
) -> Result<RefineArtifacts, ResolutionMismatchError> {
    let grid = (prior.width(), prior.height());
    check_grid("parsing", grid, (parsing.width(), parsing.height()))?;
    check_grid("pose", grid, (pose.width(), pose.height()))?;

    // Thin skeleton strokes become a usable silhouette region.
    let pose_silhouette = dilate(&pose.to_luma(), params.pose_dilate);

    // Part-boundary edges, widened into erase bands.
    let edge_map = canny(&parsing.to_luma(), params.edge_low, params.edge_high);
    let edges = dilate(&edge_map, params.edge_dilate);

    // Start from the prior, binarized so nothing non-binary leaks through.
    let mut mask = GrayImageU8::new(prior.width(), prior.height());
    for (dst, &src) in mask.as_mut_slice().iter_mut().zip(prior.as_slice()) {
        *dst = if src != 0 { 255 } else { 0 };
    }

    // Erase pass: edges punch holes along part boundaries.
    for (dst, &edge) in mask.as_mut_slice().iter_mut().zip(edges.as_slice()) {
        if edge != 0 {
            *dst = 0;
        }
    }

    // Fill pass, strictly after erase: the pose silhouette always wins.
    for (dst, &pose_px) in mask
        .as_mut_slice()
        .iter_mut()
        .zip(pose_silhouette.as_slice())
    {
        if pose_px != 0 {
            *dst = 255;
        }
    }

    debug!(
        "refine_mask: {}x{} grid, edge kernel {}, pose kernel {}",
        grid.0, grid.1, params.edge_dilate, params.pose_dilate
    );
    Ok(RefineArtifacts {
        mask,
        edges,
        pose_silhouette,
    })
}

fn check_grid(
    input: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<(), ResolutionMismatchError> {
    if expected != found {
        return Err(ResolutionMismatchError {
            input,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_pose_grid_is_rejected() {
        let prior = GrayImageU8::new(10, 10);
        let parsing = RgbImageU8::new(10, 10);
        let pose = RgbImageU8::new(9, 10);
        let err = refine_mask(&prior, &parsing, &pose, &RefineParams::default()).unwrap_err();
        assert_eq!(err.input, "pose");
        assert_eq!(err.expected, (10, 10));
        assert_eq!(err.found, (9, 10));
    }

    #[test]
    fn output_is_binary_even_for_gray_priors() {
        let prior = GrayImageU8::filled(8, 8, 130);
        let parsing = RgbImageU8::new(8, 8);
        let pose = RgbImageU8::new(8, 8);
        let mask = refine_mask(&prior, &parsing, &pose, &RefineParams::default()).unwrap();
        assert!(mask.as_slice().iter().all(|&v| v == 255));
    }
}
