use charmask::image::io::{load_grayscale_image, save_rgb_u8};
use charmask::labels::LabelMask;
use charmask::palette::colorize_labels;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ColorizeToolConfig {
    /// Label mask stored as a single-channel image of raw class ids.
    pub labels: PathBuf,
    pub output: PathBuf,
}

pub fn load_config(path: &Path) -> Result<ColorizeToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.labels)?;
    let mask = LabelMask::from_raw(gray.width(), gray.height(), gray.into_raw())
        .ok_or_else(|| "Label buffer size mismatch".to_string())?;
    let colored = colorize_labels(&mask);
    save_rgb_u8(&colored, &config.output)?;

    println!(
        "Saved palette visualization to {} ({}x{})",
        config.output.display(),
        colored.width(),
        colored.height()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: colorize_labels <config.json>".to_string()
}
