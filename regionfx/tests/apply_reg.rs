//! Adjustment dispatch regression test
//!
//! Run with:
//! ```
//! cargo test -p regionfx --test apply_reg
//! ```

use regionfx::filter::{BlurOptions, SmartSmoothOptions, SmoothMode, TransitionOptions};
use regionfx::region::{EqualizeOptions, HolePatchOptions, LineReference};
use regionfx::{Adjustment, CoverageMask, Layer, apply};
use regionfx_test::{RegParams, full_mask, rgba_from_fn};

fn every_adjustment(width: u32, height: u32) -> Vec<Adjustment> {
    let white = vec![255u8; (width * height) as usize];
    vec![
        Adjustment::Equalize(EqualizeOptions::default()),
        Adjustment::Equalize(EqualizeOptions::default().with_weighted(true)),
        Adjustment::Blur(BlurOptions::default()),
        Adjustment::Transition(TransitionOptions::default()),
        Adjustment::SmartSmooth(SmartSmoothOptions::default()),
        Adjustment::SmartSmooth(SmartSmoothOptions::default().with_mode(SmoothMode::Edge)),
        Adjustment::SmartSmooth(SmartSmoothOptions::default().with_mode(SmoothMode::Line)),
        Adjustment::PatchHoles {
            roi: regionfx::Rect::from_xywh(0, 0, width, height),
            reference: LineReference::from_channels(&white, width, height, 1).unwrap(),
            options: HolePatchOptions::default(),
        },
    ]
}

#[test]
fn apply_reg() {
    let mut rp = RegParams::new("apply");

    // -----------------------------------------------------------
    // Red/blue square through the dispatcher
    // -----------------------------------------------------------
    let pixs = rgba_from_fn(4, 4, |_, y| {
        if y < 2 { [255, 0, 0, 255] } else { [0, 0, 255, 255] }
    })
    .unwrap();
    let mask = full_mask(4, 4).unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();

    let out = apply(&layer, &Adjustment::Equalize(EqualizeOptions::default()));
    for y in 0..4 {
        for x in 0..4 {
            let p = out.get(x, y).unwrap();
            rp.compare_values(128.0, p[0] as f64, 0.0);
            rp.compare_values(128.0, p[2] as f64, 0.0);
        }
    }
    rp.write_png(&out).unwrap();

    assert!(rp.cleanup());
}

#[test]
fn apply_empty_selection_is_identity() {
    let pixs = rgba_from_fn(24, 18, |x, y| {
        [(x * 10) as u8, (y * 14) as u8, ((x + y) * 5) as u8, if x % 3 == 0 { 0 } else { 255 }]
    })
    .unwrap();
    let mask = CoverageMask::new(24, 18).unwrap();
    for background in [false, true] {
        let layer = Layer::new(&pixs, &mask, background).unwrap();
        for adjustment in every_adjustment(24, 18) {
            assert_eq!(apply(&layer, &adjustment), pixs, "{}", adjustment.name());
        }
    }
}

#[test]
fn apply_never_touches_unselected_pixels() {
    let pixs = rgba_from_fn(24, 18, |x, y| {
        [(x * 10) as u8, (y * 14) as u8, 90, if (x + y) % 5 == 0 { 0 } else { 255 }]
    })
    .unwrap();
    let mask = regionfx_test::mask_from_fn(24, 18, |x, y| {
        if (6..18).contains(&x) && (4..14).contains(&y) { 255 } else { 0 }
    })
    .unwrap();
    let layer = Layer::new(&pixs, &mask, false).unwrap();
    for adjustment in every_adjustment(24, 18) {
        let out = apply(&layer, &adjustment);
        for y in 0..18 {
            for x in 0..24 {
                if mask.at((y * 24 + x) as usize) == 0 {
                    assert_eq!(out.get(x, y), pixs.get(x, y), "{} at ({}, {})", adjustment.name(), x, y);
                }
            }
        }
    }
}
