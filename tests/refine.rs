mod common;

use charmask::prelude::*;
use common::synthetic_image::{gray_with_rect, rgb_with_rect, solid_rgb};

/// Pose-fill overrides edge-erase, which overrides the prior.
///
/// A vertical luma step in the parsing image produces an edge band; a pose
/// stroke runs inside that band. Pixels covered by the dilated pose must be
/// 255 even where the band erases, the rest of the band must be 0, and the
/// prior survives everywhere else.
#[test]
fn pose_fill_beats_edge_erase_beats_prior() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (60usize, 40usize);
    let prior = GrayImageU8::filled(w, h, 255);
    // Black/white split: the step sits between x=29 and x=30.
    let parsing = rgb_with_rect(w, h, (30, 0, 60, 40), [255, 255, 255]);
    // Skeleton stroke at x=30, rows 10..30, inside the edge band.
    let pose = rgb_with_rect(w, h, (30, 10, 31, 30), [255, 255, 255]);

    let params = RefineParams {
        edge_low: 10.0,
        edge_high: 150.0,
        edge_dilate: 8,
        pose_dilate: 2,
    };
    let mask = refine_mask(&prior, &parsing, &pose, &params).unwrap();

    // Pose-dilated region (kernel 2, anchor 1): x in [30, 31], y in [10, 30].
    assert_eq!(mask.get(30, 20), 255, "pose fill must win inside the band");
    assert_eq!(mask.get(31, 20), 255, "pose fill must win inside the band");
    // Edge band without pose coverage is erased.
    assert_eq!(mask.get(27, 20), 0, "edge band must erase the prior");
    assert_eq!(mask.get(33, 20), 0, "edge band must erase the prior");
    assert_eq!(mask.get(30, 35), 0, "band rows without pose stay erased");
    // Far from both regions the prior is untouched.
    assert_eq!(mask.get(5, 20), 255);
    assert_eq!(mask.get(55, 20), 255);
}

/// Black prior, one 10×10 pose square, featureless parsing image: the output
/// is white exactly on the pose square grown by the pose kernel.
#[test]
fn pose_square_on_black_prior() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (100usize, 100usize);
    let prior = GrayImageU8::new(w, h);
    let parsing = solid_rgb(w, h, [37, 37, 37]); // uniform: no detectable edges
    let pose = rgb_with_rect(w, h, (40, 40, 50, 50), [255, 255, 255]);

    let params = RefineParams {
        pose_dilate: 10,
        ..RefineParams::default()
    };
    let mask = refine_mask(&prior, &parsing, &pose, &params).unwrap();

    // Kernel 10, anchor 5: the square [40, 50) grows to [36, 54] inclusive.
    for y in 0..h {
        for x in 0..w {
            let inside = (36..=54).contains(&x) && (36..=54).contains(&y);
            assert_eq!(
                mask.get(x, y),
                if inside { 255 } else { 0 },
                "unexpected value at ({x},{y})"
            );
        }
    }
}

/// Same setup, but a strong edge band now crosses the pose square. Pose-fill
/// still wins inside the pose-dilated region per the precedence law.
#[test]
fn pose_square_survives_crossing_edge_band() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (100usize, 100usize);
    let prior = GrayImageU8::filled(w, h, 255);
    // Strong vertical step through the middle of the pose square.
    let parsing = rgb_with_rect(w, h, (45, 0, 100, 100), [255, 255, 255]);
    let pose = rgb_with_rect(w, h, (40, 40, 50, 50), [255, 255, 255]);

    let params = RefineParams::default(); // edge kernel 20, pose kernel 10
    let mask = refine_mask(&prior, &parsing, &pose, &params).unwrap();

    // Everything the dilated pose covers is filled, edges notwithstanding.
    for y in 36..=54 {
        for x in 36..=54 {
            assert_eq!(mask.get(x, y), 255, "pose region erased at ({x},{y})");
        }
    }
    // The edge band beyond the pose region erases the white prior.
    assert_eq!(mask.get(45, 5), 0);
    assert_eq!(mask.get(45, 95), 0);
    // Prior survives away from both regions.
    assert_eq!(mask.get(5, 50), 255);
}

/// Zero-extent structuring elements leave the edge and pose masks untouched:
/// no unintended thickening in either direction.
#[test]
fn zero_kernels_do_not_thicken() {
    let (w, h) = (50usize, 50usize);
    let prior = GrayImageU8::new(w, h);
    let parsing = solid_rgb(w, h, [0, 0, 0]);
    let pose = rgb_with_rect(w, h, (20, 20, 30, 30), [255, 255, 255]);

    let params = RefineParams {
        edge_dilate: 0,
        pose_dilate: 0,
        ..RefineParams::default()
    };
    let mask = refine_mask(&prior, &parsing, &pose, &params).unwrap();

    for y in 0..h {
        for x in 0..w {
            let inside = (20..30).contains(&x) && (20..30).contains(&y);
            assert_eq!(
                mask.get(x, y),
                if inside { 255 } else { 0 },
                "kernel 0 must reproduce the raw pose mask at ({x},{y})"
            );
        }
    }
}

/// Gray (non-binary) pose strokes still count as silhouette, and the output
/// stays strictly binary.
#[test]
fn output_is_strictly_binary() {
    let (w, h) = (30usize, 30usize);
    let prior = gray_with_rect(w, h, (0, 0, 15, 30), 128);
    let parsing = solid_rgb(w, h, [80, 80, 80]);
    let pose = rgb_with_rect(w, h, (20, 5, 25, 10), [60, 60, 60]);

    let mask = refine_mask(&prior, &parsing, &pose, &RefineParams::default()).unwrap();
    assert!(mask.as_slice().iter().all(|&v| v == 0 || v == 255));
    assert_eq!(mask.get(2, 2), 255, "non-zero prior counts as foreground");
    assert_eq!(mask.get(22, 7), 255, "faint pose strokes still fill");
}
