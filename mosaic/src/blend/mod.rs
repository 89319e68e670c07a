//! Feathered accumulation of positioned images into a shared float buffer.
//!
//! Each image is added in two passes over its destination bounding box:
//!
//! 1. **Exposure estimate**: where both the mosaic so far and the new image have
//!    data, the luma ratio `mosaic / image` is sampled. Ratios inside the accepted
//!    range are averaged into a single scale for the image.
//! 2. **Feather blend**: every destination pixel whose inverse-mapped source
//!    position lies inside the image gets the bilinear source colour, scaled by the
//!    exposure factor and clamped to 255, weighted by a horizontal feather ramp.
//!
//! Source pixels are invalid when their validity mask says so, or, without a mask,
//! when the nearest source pixel is pure black. Invalid pixels contribute zero
//! weight.

mod accumulator;
mod exposure;
mod feather;


use std::ops::Range;

use glam::DVec2;

use crate::bbox::compute_bounding_box;
use crate::config::BlendConfig;
use crate::image::{ByteImage, ValidityMask};
use crate::interpolation::{bilinear_sample_rgb, nearest_pixel};
use crate::transform::Transform;

pub use accumulator::{Accumulator, ACCUMULATOR_CHANNELS};
pub use exposure::{luma, LumaEstimate, LUMA_WEIGHTS};
pub use feather::feather_weight;

/// Outcome of adding one image to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccumulationStats {
    /// Exposure factor applied to the image's samples.
    pub luma_scale: f64,
    /// Overlap samples whose luma ratio was accepted.
    pub exposure_samples: usize,
    /// Destination pixels that received non-zero weight.
    pub contributing_pixels: usize,
}

impl Default for AccumulationStats {
    fn default() -> Self {
        Self {
            luma_scale: 1.0,
            exposure_samples: 0,
            contributing_pixels: 0,
        }
    }
}

/// Which source pixels carry real data.
#[derive(Debug, Clone, Copy)]
enum SourceValidity<'a> {
    /// Pure black marks unused pixels.
    BlackSentinel,
    Mask(&'a ValidityMask),
}

impl SourceValidity<'_> {
    #[inline]
    fn pixel_is_valid(&self, image: &ByteImage, x: usize, y: usize) -> bool {
        match self {
            SourceValidity::BlackSentinel => !image.is_black(x, y),
            SourceValidity::Mask(mask) => mask.get(x, y, 0),
        }
    }
}

/// Add `image`, placed by `transform` (source to destination), into `accumulator`.
///
/// `mask`, if given, must match the image's width and height and replaces the
/// black-pixel sentinel. Destination pixels outside the accumulator are skipped.
///
/// # Panics
///
/// Panics if the image has fewer than 3 channels, the mask extent differs from
/// the image, or `transform` is not invertible.
pub fn accumulate(
    accumulator: &mut Accumulator,
    image: &ByteImage,
    mask: Option<&ValidityMask>,
    transform: &Transform,
    config: &BlendConfig,
) -> AccumulationStats {
    assert!(image.channels() >= 3, "source image must have RGB channels");
    if let Some(mask) = mask {
        assert!(
            mask.dimensions().same_extent(&image.dimensions()),
            "validity mask must match the image extent"
        );
    }
    if image.is_empty() {
        return AccumulationStats::default();
    }

    let validity = match mask {
        Some(mask) => SourceValidity::Mask(mask),
        None => SourceValidity::BlackSentinel,
    };
    let inverse = transform.inverse();
    let bbox = compute_bounding_box(image.width(), image.height(), transform);
    let rows = clip_range(bbox.min_y, bbox.max_y, accumulator.height());
    let cols = clip_range(bbox.min_x, bbox.max_x, accumulator.width());

    let estimate = if config.exposure_compensation {
        estimate_exposure(accumulator, image, validity, &inverse, &rows, &cols, config)
    } else {
        LumaEstimate::new()
    };
    let luma_scale = estimate.scale();

    let src_w = image.width() as f64;
    let src_h = image.height() as f64;
    let mut contributing_pixels = 0;

    for y in rows.clone() {
        for x in cols.clone() {
            let src = inverse.apply(DVec2::new(x as f64, y as f64));
            // The last source row and column have no bilinear neighbour.
            if !(src.x >= 0.0 && src.x < src_w - 1.0 && src.y >= 0.0 && src.y < src_h - 1.0) {
                continue;
            }

            let (ix, iy) = nearest_pixel(image, src.x, src.y);
            if !validity.pixel_is_valid(image, ix, iy) {
                continue;
            }
            let weight = feather_weight(x as i32, &bbox, config.blend_width);
            if weight <= 0.0 {
                continue;
            }

            let rgb = bilinear_sample_rgb(image, src.x, src.y).map(|v| (v * luma_scale).min(255.0));
            accumulator.add(x, y, rgb, weight);
            contributing_pixels += 1;
        }
    }

    AccumulationStats {
        luma_scale,
        exposure_samples: estimate.samples(),
        contributing_pixels,
    }
}

fn estimate_exposure(
    accumulator: &Accumulator,
    image: &ByteImage,
    validity: SourceValidity<'_>,
    inverse: &Transform,
    rows: &Range<usize>,
    cols: &Range<usize>,
    config: &BlendConfig,
) -> LumaEstimate {
    let src_w = image.width() as f64;
    let src_h = image.height() as f64;
    let mut estimate = LumaEstimate::new();

    for y in rows.clone() {
        for x in cols.clone() {
            let src = inverse.apply(DVec2::new(x as f64, y as f64));
            if !(src.x >= 0.0 && src.x < src_w && src.y >= 0.0 && src.y < src_h) {
                continue;
            }
            let Some(mosaic_rgb) = accumulator.mean_color(x, y) else {
                continue;
            };

            let image_rgb = bilinear_sample_rgb(image, src.x, src.y);
            let usable = match validity {
                SourceValidity::BlackSentinel => image_rgb.iter().any(|&v| v != 0.0),
                SourceValidity::Mask(_) => {
                    let (ix, iy) = nearest_pixel(image, src.x, src.y);
                    validity.pixel_is_valid(image, ix, iy)
                }
            };
            if !usable {
                continue;
            }

            let image_luma = luma(image_rgb);
            if image_luma <= 0.0 {
                continue;
            }
            let ratio = luma(mosaic_rgb) / image_luma;
            if config.accepts_ratio(ratio) {
                estimate.add(ratio);
            }
        }
    }

    estimate
}

/// Intersect `[min, max)` with `[0, len)`.
fn clip_range(min: i32, max: i32, len: usize) -> Range<usize> {
    let start = (min.max(0) as usize).min(len);
    let end = (max.max(0) as usize).min(len);
    start..end.max(start)
}
