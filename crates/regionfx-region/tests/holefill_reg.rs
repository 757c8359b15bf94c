//! Color-hole patching regression test
//!
//! Run with:
//! ```
//! cargo test -p regionfx-region --test holefill_reg
//! ```

use regionfx_core::{CoverageMask, Layer, Rect};
use regionfx_region::{HolePatchOptions, LineReference, patch_color_holes};
use regionfx_test::{RegParams, full_mask, mask_from_fn, rgba_from_fn};

const RED: [u8; 4] = [255, 0, 0, 255];
const INK: [u8; 4] = [0, 0, 0, 255];
const EMPTY: [u8; 4] = [0, 0, 0, 0];

fn scenario_options() -> HolePatchOptions {
    HolePatchOptions::default()
        .with_max_distance(10)
        .with_line_sensitivity(0.0)
        .with_line_grow(0)
}

#[test]
fn holefill_reg() {
    let mut rp = RegParams::new("holefill");

    // -----------------------------------------------------------
    // 5x1 row: red seed, hole, ink line, hole, hole
    // -----------------------------------------------------------
    let pixs = rgba_from_fn(5, 1, |x, _| match x {
        0 => RED,
        2 => INK,
        _ => EMPTY,
    })
    .unwrap();
    let mask = full_mask(5, 1).unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();
    let lines = LineReference::from_rgba(pixs.clone());

    let out = patch_color_holes(&layer, layer.bounds().full_rect(), &lines, &scenario_options());

    // Pixel 1 inherits the seed color; the ink barrier stops the BFS
    rp.compare_values(255.0, out.get(1, 0).unwrap()[0] as f64, 0.0);
    rp.compare_values(255.0, out.get(1, 0).unwrap()[3] as f64, 0.0);
    rp.compare_values(0.0, out.get(3, 0).unwrap()[3] as f64, 0.0);
    rp.compare_values(0.0, out.get(4, 0).unwrap()[3] as f64, 0.0);
    // The seed and the line are never rewritten
    rp.compare_values(1.0, (out.get(0, 0) == Some(RED)) as u8 as f64, 0.0);
    rp.compare_values(1.0, (out.get(2, 0) == Some(INK)) as u8 as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn holefill_distance_bound() {
    // 12x1 row, single blue seed at x=0, everything else empty
    let pixs = rgba_from_fn(12, 1, |x, _| if x == 0 { [0, 0, 255, 255] } else { EMPTY }).unwrap();
    let mask = full_mask(12, 1).unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();
    let lines = LineReference::from_channels(&[255; 12], 12, 1, 1).unwrap();

    let out = patch_color_holes(
        &layer,
        layer.bounds().full_rect(),
        &lines,
        &scenario_options().with_max_distance(4),
    );
    for x in 1..=4 {
        assert_eq!(out.get(x, 0), Some([0, 0, 255, 255]), "x = {}", x);
    }
    for x in 5..12 {
        assert_eq!(out.get(x, 0), Some(EMPTY), "x = {}", x);
    }
}

#[test]
fn holefill_nearest_seed_wins() {
    let pixs = rgba_from_fn(7, 1, |x, _| match x {
        0 => [255, 0, 0, 255],
        6 => [0, 255, 0, 255],
        _ => EMPTY,
    })
    .unwrap();
    let mask = full_mask(7, 1).unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();
    let lines = LineReference::from_channels(&[255; 7], 7, 1, 1).unwrap();

    let out = patch_color_holes(&layer, layer.bounds().full_rect(), &lines, &scenario_options());
    assert_eq!(out.get(1, 0), Some([255, 0, 0, 255]));
    assert_eq!(out.get(2, 0), Some([255, 0, 0, 255]));
    assert_eq!(out.get(4, 0), Some([0, 255, 0, 255]));
    assert_eq!(out.get(5, 0), Some([0, 255, 0, 255]));
}

#[test]
fn holefill_stays_inside_selection_and_roi() {
    // 6x3 grid, seed in the corner, the right half is unselected
    let pixs = rgba_from_fn(6, 3, |x, y| if (x, y) == (0, 0) { RED } else { EMPTY }).unwrap();
    let mask = mask_from_fn(6, 3, |x, _| if x < 3 { 255 } else { 0 }).unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();
    let lines = LineReference::from_channels(&[255; 18], 6, 3, 1).unwrap();

    let out = patch_color_holes(&layer, layer.bounds().full_rect(), &lines, &scenario_options());
    assert_eq!(out.get(2, 2), Some(RED));
    assert_eq!(out.get(3, 0), Some(EMPTY));
    assert_eq!(out.get(5, 2), Some(EMPTY));

    // An ROI covering only the first two rows leaves the third untouched
    let out = patch_color_holes(&layer, Rect::new(0, 0, 6, 2), &lines, &scenario_options());
    assert_eq!(out.get(2, 1), Some(RED));
    assert_eq!(out.get(0, 2), Some(EMPTY));
}

#[test]
fn holefill_noop_cases() {
    let pixs = rgba_from_fn(4, 1, |x, _| if x == 0 { RED } else { EMPTY }).unwrap();
    let mask = full_mask(4, 1).unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();
    let lines = LineReference::from_channels(&[255; 4], 4, 1, 1).unwrap();
    let full = layer.bounds().full_rect();

    // max_distance of zero
    let out = patch_color_holes(&layer, full, &lines, &scenario_options().with_max_distance(0));
    assert_eq!(out, pixs);

    // line reference on a different grid
    let wrong = LineReference::from_channels(&[255; 8], 8, 1, 1).unwrap();
    let out = patch_color_holes(&layer, full, &wrong, &scenario_options());
    assert_eq!(out, pixs);

    // empty selection: no seeds at all
    let empty = CoverageMask::new(4, 1).unwrap();
    let unselected = Layer::new(&pixs, &empty, false).unwrap();
    let out = patch_color_holes(&unselected, full, &lines, &scenario_options());
    assert_eq!(out, pixs);
}

#[test]
fn holefill_grown_barrier_blocks_gap() {
    // Ink at x=3 grown by one also blocks x=2 and x=4
    let pixs = rgba_from_fn(7, 1, |x, _| if x == 0 { RED } else { EMPTY }).unwrap();
    let mask = full_mask(7, 1).unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();
    let gray: Vec<u8> = (0..7).map(|x| if x == 3 { 0 } else { 255 }).collect();
    let lines = LineReference::from_channels(&gray, 7, 1, 1).unwrap();

    let out = patch_color_holes(
        &layer,
        layer.bounds().full_rect(),
        &lines,
        &scenario_options().with_line_grow(1),
    );
    assert_eq!(out.get(1, 0), Some(RED));
    assert_eq!(out.get(2, 0), Some(EMPTY));
    assert_eq!(out.get(5, 0), Some(EMPTY));
}
