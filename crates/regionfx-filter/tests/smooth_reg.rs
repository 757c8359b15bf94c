//! Smart edge smoothing regression test
//!
//! Run with:
//! ```
//! cargo test -p regionfx-filter --test smooth_reg
//! ```
//!
//! Write PNG snapshots:
//! ```
//! REGTEST_MODE=display cargo test -p regionfx-filter --test smooth_reg
//! ```

use regionfx_core::{CoverageMask, Layer, RgbaBuffer};
use regionfx_filter::{SmartSmoothOptions, SmoothMode, smart_smooth};
use regionfx_test::{RegParams, count_changed, full_mask, mask_from_fn, rgba_from_fn};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const INK: [u8; 4] = [0, 0, 0, 255];

fn options(mode: SmoothMode) -> SmartSmoothOptions {
    SmartSmoothOptions::default().with_mode(mode)
}

/// 120x40 white canvas crossed by a 3px horizontal ink line
fn line_canvas() -> RgbaBuffer {
    rgba_from_fn(120, 40, |_, y| if (19..22).contains(&y) { INK } else { WHITE }).unwrap()
}

/// Rows of column `x` that read as ink
fn ink_rows(buf: &RgbaBuffer, x: u32) -> Vec<u32> {
    (0..buf.height())
        .filter(|&y| buf.get(x, y).is_some_and(|p| p[0] < 128))
        .collect()
}

/// The redrawn line stays dark, about 3px thick and centered on row 20
fn check_redrawn_line(rp: &mut RegParams, out: &RgbaBuffer) {
    rp.compare_values(1.0, (out.get(50, 20).unwrap()[0] < 64) as u8 as f64, 0.0);
    for x in [10, 50, 90] {
        let rows = ink_rows(out, x);
        rp.compare_values(3.0, rows.len() as f64, 1.0);
        let center = rows.iter().sum::<u32>() as f64 / rows.len().max(1) as f64;
        rp.compare_values(20.0, center, 1.0);
    }
}

#[test]
fn smooth_reg() {
    let mut rp = RegParams::new("smooth");

    // -----------------------------------------------------------
    // Ink line, selection covers x < 100
    // -----------------------------------------------------------
    let pixs = line_canvas();
    let mask = mask_from_fn(120, 40, |x, _| if x < 100 { 255 } else { 0 }).unwrap();
    let layer = Layer::new(&pixs, &mask, true).unwrap();

    let auto = smart_smooth(&layer, &options(SmoothMode::Auto));
    rp.write_png(&auto).unwrap();
    rp.compare_values(1.0, (count_changed(&pixs, &auto) > 0) as u8 as f64, 0.0);
    check_redrawn_line(&mut rp, &auto);

    // Unselected pixels are never written
    let mut outside_changed = 0;
    for y in 0..40 {
        for x in 100..120 {
            if auto.get(x, y) != pixs.get(x, y) {
                outside_changed += 1;
            }
        }
    }
    rp.compare_values(0.0, outside_changed as f64, 0.0);

    // Rows far from the line are not touched
    for x in 0..100 {
        rp.compare_values(255.0, auto.get(x, 2).unwrap()[0] as f64, 0.0);
    }

    // The line is found, so line mode redraws it too
    let line = smart_smooth(&layer, &options(SmoothMode::Line));
    rp.write_png(&line).unwrap();
    rp.compare_values(1.0, (count_changed(&pixs, &line) > 0) as u8 as f64, 0.0);
    check_redrawn_line(&mut rp, &line);

    // Zero line strength keeps the resynthesis out of the result
    let weak = smart_smooth(&layer, &options(SmoothMode::Line).with_line_strength(0.0));
    rp.compare_buffers(&pixs, &weak);

    assert!(rp.cleanup());
}

#[test]
fn smooth_huge_background_radius() {
    let pixs = line_canvas();
    let mask = mask_from_fn(120, 40, |x, _| if x < 100 { 255 } else { 0 }).unwrap();
    let layer = Layer::new(&pixs, &mask, true).unwrap();
    let huge = smart_smooth(
        &layer,
        &options(SmoothMode::Auto).with_background_smooth_radius(u32::MAX),
    );
    // Any radius past the work rect covers the whole rect
    let wide = smart_smooth(
        &layer,
        &options(SmoothMode::Auto).with_background_smooth_radius(1000),
    );
    assert_eq!(huge, wide);
    for y in 0..40 {
        for x in 100..120 {
            assert_eq!(huge.get(x, y), pixs.get(x, y));
        }
    }
}

#[test]
fn smooth_is_deterministic() {
    let pixs = line_canvas();
    let mask = full_mask(120, 40).unwrap();
    let layer = Layer::new(&pixs, &mask, true).unwrap();
    for mode in [SmoothMode::Auto, SmoothMode::Edge, SmoothMode::Line] {
        let a = smart_smooth(&layer, &options(mode));
        let b = smart_smooth(&layer, &options(mode));
        assert_eq!(a, b);
    }
}

#[test]
fn smooth_empty_mask_is_identity() {
    let pixs = line_canvas();
    let mask = CoverageMask::new(120, 40).unwrap();
    for background in [false, true] {
        let layer = Layer::new(&pixs, &mask, background).unwrap();
        for mode in [SmoothMode::Auto, SmoothMode::Edge, SmoothMode::Line] {
            assert_eq!(smart_smooth(&layer, &options(mode)), pixs);
        }
    }
}

#[test]
fn smooth_line_mode_without_stroke_is_identity() {
    // A 3x3 ink blob: edges exist, but no component reaches 180 pixels
    let pixs = rgba_from_fn(12, 12, |x, y| {
        if (4..7).contains(&x) && (4..7).contains(&y) { INK } else { WHITE }
    })
    .unwrap();
    let mask = full_mask(12, 12).unwrap();
    let layer = Layer::new(&pixs, &mask, true).unwrap();
    assert_eq!(smart_smooth(&layer, &options(SmoothMode::Line)), pixs);
}

#[test]
fn smooth_edge_mode_removes_jag() {
    let mut rp = RegParams::new("smooth_edge");

    // Straight vertical step: the median keeps it as is
    let step = rgba_from_fn(30, 30, |x, _| if x < 15 { INK } else { WHITE }).unwrap();
    let mask = full_mask(30, 30).unwrap();
    let layer = Layer::new(&step, &mask, true).unwrap();
    let out = smart_smooth(&layer, &options(SmoothMode::Edge));
    rp.compare_buffers(&step, &out);

    // One ink pixel sticking out of the step is pulled toward white
    let mut jag = step.clone();
    jag.put(15, 15, INK);
    let layer = Layer::new(&jag, &mask, true).unwrap();
    let out = smart_smooth(&layer, &options(SmoothMode::Edge));
    rp.write_png(&out).unwrap();
    rp.compare_values(1.0, count_changed(&jag, &out) as f64, 0.0);
    let fixed = out.get(15, 15).unwrap();
    rp.compare_values(1.0, (fixed[0] > 100) as u8 as f64, 0.0);
    rp.compare_values(255.0, fixed[3] as f64, 0.0);

    // Zero strength disables the cleanup
    let off = smart_smooth(
        &layer,
        &options(SmoothMode::Edge).with_edge_median_strength(0.0),
    );
    rp.compare_buffers(&jag, &off);

    assert!(rp.cleanup());
}

#[test]
fn smooth_transparent_layer_unchanged() {
    let pixs = rgba_from_fn(16, 16, |x, y| [(x * 16) as u8, (y * 16) as u8, 3, 0]).unwrap();
    let mask = full_mask(16, 16).unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();
    assert_eq!(smart_smooth(&layer, &options(SmoothMode::Auto)), pixs);
}
