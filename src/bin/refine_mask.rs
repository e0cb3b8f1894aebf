use charmask::config::{load_refine_config, RefineToolConfig};
use charmask::image::io::{
    load_grayscale_image, load_rgb_image, save_grayscale_u8, write_json_file,
};
use charmask::image::{resize_bilinear_rgb, GrayImageU8};
use charmask::refine::refine_mask_detailed;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: RefineToolConfig = load_refine_config(Path::new(&config_path))?;

    let prior: GrayImageU8 = load_grayscale_image(&config.prior)?;
    let parsing = load_rgb_image(&config.parsing)?;
    let pose = load_rgb_image(&config.pose)?;

    // Everything fuses on the prior's pixel grid.
    let parsing = resize_bilinear_rgb(&parsing, prior.width(), prior.height());
    let pose = resize_bilinear_rgb(&pose, prior.width(), prior.height());

    let params = config.refine.to_params();
    let artifacts =
        refine_mask_detailed(&prior, &parsing, &pose, &params).map_err(|e| e.to_string())?;

    save_grayscale_u8(&artifacts.mask, &config.output.mask)?;
    if let Some(path) = &config.output.edges {
        save_grayscale_u8(&artifacts.edges, path)?;
    }
    if let Some(path) = &config.output.pose_silhouette {
        save_grayscale_u8(&artifacts.pose_silhouette, path)?;
    }

    let filled = artifacts
        .mask
        .as_slice()
        .iter()
        .filter(|&&v| v != 0)
        .count();
    if let Some(path) = &config.output.summary_json {
        let summary = RefineSummary {
            width: artifacts.mask.width(),
            height: artifacts.mask.height(),
            filled_pixels: filled,
            edge_low: params.edge_low,
            edge_high: params.edge_high,
            edge_dilate: params.edge_dilate,
            pose_dilate: params.pose_dilate,
        };
        write_json_file(path, &summary)?;
    }

    println!(
        "Saved refined mask to {} ({} of {} pixels filled)",
        config.output.mask.display(),
        filled,
        artifacts.mask.width() * artifacts.mask.height()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: refine_mask <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefineSummary {
    width: usize,
    height: usize,
    filled_pixels: usize,
    edge_low: f32,
    edge_high: f32,
    edge_dilate: usize,
    pose_dilate: usize,
}
