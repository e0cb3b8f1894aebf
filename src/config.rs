//! JSON configuration for the tool binaries.

use crate::refine::RefineParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config of the `refine_mask` tool: three aligned input images, refinement
/// knobs, and output paths.
#[derive(Debug, Deserialize)]
pub struct RefineToolConfig {
    /// Rough prior mask (single-channel).
    pub prior: PathBuf,
    /// Parsing visualization (palette-encoded color image).
    pub parsing: PathBuf,
    /// Pose skeleton image.
    pub pose: PathBuf,
    #[serde(default)]
    pub refine: RefineConfig,
    pub output: RefineOutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    pub edge_low: f32,
    pub edge_high: f32,
    pub edge_dilate: usize,
    pub pose_dilate: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        let params = RefineParams::default();
        Self {
            edge_low: params.edge_low,
            edge_high: params.edge_high,
            edge_dilate: params.edge_dilate,
            pose_dilate: params.pose_dilate,
        }
    }
}

impl RefineConfig {
    pub fn to_params(&self) -> RefineParams {
        RefineParams {
            edge_low: self.edge_low,
            edge_high: self.edge_high,
            edge_dilate: self.edge_dilate,
            pose_dilate: self.pose_dilate,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RefineOutputConfig {
    /// Final binary mask.
    pub mask: PathBuf,
    /// Optional debug dump of the dilated edge bands.
    #[serde(default)]
    pub edges: Option<PathBuf>,
    /// Optional debug dump of the dilated pose silhouette.
    #[serde(default)]
    pub pose_silhouette: Option<PathBuf>,
    /// Optional JSON run summary.
    #[serde(default)]
    pub summary_json: Option<PathBuf>,
}

pub fn load_refine_config(path: &Path) -> Result<RefineToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
