//! Horizontal feather ramps.

use crate::bbox::BoundingBox;

/// Blend weight of destination column `x` for an image covering `bbox`.
///
/// The weight ramps linearly from 0 at `bbox.min_x` to 1 at `bbox.min_x + blend_width`,
/// stays at 1 across the interior, then ramps back to 0 at `bbox.max_x`. When both
/// ramps cover `x` (images narrower than `2 * blend_width`), the right ramp wins.
/// The result is always in `[0, 1]`.
#[inline]
pub fn feather_weight(x: i32, bbox: &BoundingBox, blend_width: f64) -> f64 {
    let x = x as f64;
    let min_x = bbox.min_x as f64;
    let max_x = bbox.max_x as f64;

    let mut weight = 1.0;
    if x >= min_x && x < min_x + blend_width {
        weight = (x - min_x) / blend_width;
    }
    if x <= max_x && x > max_x - blend_width {
        weight = (max_x - x) / blend_width;
    }
    weight.clamp(0.0, 1.0)
}
