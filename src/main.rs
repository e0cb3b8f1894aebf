use charmask::engine::UniformModel;
use charmask::prelude::*;

fn main() {
    // Demo stub: runs the pipeline on synthetic buffers with a weightless
    // stub model (everything argmaxes to background).
    let (w, h) = (96usize, 128usize);
    let photo = RgbImageU8::new(w, h);
    let prior = GrayImageU8::filled(w, h, 255);
    let mut pose = RgbImageU8::new(w, h);
    for y in 30..100 {
        pose.set_pixel(48, y, [255, 255, 255]); // one vertical skeleton stroke
    }

    let scheme = LabelScheme::Pascal;
    let model = UniformModel::new(scheme.input_size(), scheme.num_classes());
    let transform = CropTransform::full_image(w, h, scheme.input_size());

    let params = PipelineParams::new(scheme);
    match extract_character_mask(&photo, &transform, &pose, &prior, &model, &params) {
        Ok(result) => {
            let filled = result.mask.as_slice().iter().filter(|&&v| v != 0).count();
            println!(
                "mask {}x{}: {} filled pixels, segment {:.3} ms, refine {:.3} ms",
                result.mask.width(),
                result.mask.height(),
                filled,
                result.segment_ms,
                result.refine_ms
            );
        }
        Err(err) => eprintln!("pipeline failed: {err}"),
    }
}
