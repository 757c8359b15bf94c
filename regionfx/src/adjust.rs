//! One-call dispatch over every adjustment

use regionfx_core::{Layer, Rect, RgbaBuffer};
use regionfx_filter::{
    BlurOptions, SmartSmoothOptions, TransitionOptions, pixel_transition, separable_blur,
    smart_smooth,
};
use regionfx_region::{
    EqualizeOptions, HolePatchOptions, LineReference, equalize_regions, patch_color_holes,
};

/// A user action together with its options
#[derive(Debug, Clone)]
pub enum Adjustment {
    /// Flatten each selected region toward its average color
    Equalize(EqualizeOptions),
    /// Boundary-protected Gaussian blur
    Blur(BlurOptions),
    /// Blur with silhouette protection
    Transition(TransitionOptions),
    /// Edge smoothing with stroke resynthesis
    SmartSmooth(SmartSmoothOptions),
    /// Fill empty pixels from nearby paint, stopping at line-art barriers
    PatchHoles {
        roi: Rect,
        reference: LineReference,
        options: HolePatchOptions,
    },
}

impl Adjustment {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Adjustment::Equalize(_) => "equalize",
            Adjustment::Blur(_) => "blur",
            Adjustment::Transition(_) => "transition",
            Adjustment::SmartSmooth(_) => "smart-smooth",
            Adjustment::PatchHoles { .. } => "patch-holes",
        }
    }
}

/// Run one adjustment over a layer and return the new pixels
///
/// The layer is never modified; writing the result back is up to the
/// caller.
pub fn apply(layer: &Layer, adjustment: &Adjustment) -> RgbaBuffer {
    log::debug!(
        "apply: {} on {}x{} layer",
        adjustment.name(),
        layer.bounds().width,
        layer.bounds().height
    );
    match adjustment {
        Adjustment::Equalize(options) => equalize_regions(layer, options),
        Adjustment::Blur(options) => separable_blur(layer, options),
        Adjustment::Transition(options) => pixel_transition(layer, options),
        Adjustment::SmartSmooth(options) => smart_smooth(layer, options),
        Adjustment::PatchHoles {
            roi,
            reference,
            options,
        } => patch_color_holes(layer, *roi, reference, options),
    }
}
