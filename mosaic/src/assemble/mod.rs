//! Mosaic assembly: bounding, blending, normalization and loop-closure cropping.
//!
//! Images are placed into a shared destination frame whose origin is the
//! top-left corner of the union of all projected bounding boxes, feather-blended
//! into one [`Accumulator`], and normalized. A sequence whose first and last
//! entries carry the same name is treated as a 360° panorama: the duplicated
//! source width is cropped away and, optionally, the vertical drift between the
//! two loop endpoints is sheared out.

mod drift;


use glam::DVec2;

use crate::bbox::{compute_bounding_box, try_compute_bounding_box, BoundingBox};
use crate::blend::{accumulate, AccumulationStats, Accumulator};
use crate::config::MosaicConfig;
use crate::error::{Error, Result};
use crate::image::{ByteImage, ImageDimensions, ValidityMask};
use crate::transform::Transform;
use crate::warp::warp_global;

pub use drift::DriftCorrection;

/// A source image positioned in the destination frame.
#[derive(Debug, Clone)]
pub struct PositionedImage {
    pub image: ByteImage,
    /// Source to destination mapping.
    pub transform: Transform,
    /// Identifier used for loop-closure detection.
    pub name: String,
    /// Explicit validity flags. Without one, pure black pixels are treated as empty.
    pub mask: Option<ValidityMask>,
}

impl PositionedImage {
    pub fn new(image: ByteImage, transform: Transform, name: impl Into<String>) -> Self {
        Self {
            image,
            transform,
            name: name.into(),
            mask: None,
        }
    }

    pub fn with_mask(mut self, mask: ValidityMask) -> Self {
        self.mask = Some(mask);
        self
    }
}

/// Per-image accumulation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReport {
    pub name: String,
    pub stats: AccumulationStats,
}

/// Final mosaic plus the geometry that produced it.
#[derive(Debug, Clone)]
pub struct MosaicResult {
    pub image: ByteImage,
    pub is_panorama_360: bool,
    /// Union of all projected image boxes, in input coordinates.
    pub bounds: BoundingBox,
    /// Shape of the normalized mosaic before cropping.
    pub mosaic_dimensions: ImageDimensions,
    pub drift: DriftCorrection,
    pub images: Vec<ImageReport>,
}

/// Blend `images` with the default configuration and the given feather width.
///
/// # Panics
///
/// Panics if `blend_width` is not positive and finite.
pub fn build_mosaic(images: &[PositionedImage], blend_width: f64) -> Result<ByteImage> {
    assemble(images, &MosaicConfig::with_blend_width(blend_width)).map(|result| result.image)
}

/// Blend `images` into a single panorama.
///
/// An empty slice yields an empty 3-channel image.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn assemble(images: &[PositionedImage], config: &MosaicConfig) -> Result<MosaicResult> {
    config.validate();

    let Some(first) = images.first() else {
        return Ok(MosaicResult {
            image: ByteImage::empty(3),
            is_panorama_360: false,
            bounds: BoundingBox::default(),
            mosaic_dimensions: ImageDimensions::new(0, 0, 3),
            drift: DriftCorrection::none(),
            images: Vec::new(),
        });
    };
    validate_inputs(images)?;

    let source_width = first.image.width();
    let source_height = first.image.height();
    let is_panorama_360 = is_loop_closed(images);

    tracing::info!(
        images = images.len(),
        blend_width = config.blend.blend_width,
        is_panorama_360,
        "Assembling mosaic"
    );

    let bounds = union_bounds(images, source_width, source_height);
    let mosaic_width = (i64::from(bounds.max_x) - i64::from(bounds.min_x)).max(0) as usize;
    let mosaic_height = (i64::from(bounds.max_y) - i64::from(bounds.min_y)).max(0) as usize;
    let origin = Transform::translation(DVec2::new(-bounds.min_x as f64, -bounds.min_y as f64));

    let mut accumulator = Accumulator::new(mosaic_width, mosaic_height);
    let mut reports = Vec::with_capacity(images.len());
    let top_center = DVec2::new(0.5 * source_width as f64, 0.0);
    let mut loop_start = DVec2::ZERO;
    let mut loop_end = DVec2::ZERO;

    for (i, positioned) in images.iter().enumerate() {
        let placed = origin.compose(&positioned.transform);
        let stats = accumulate(
            &mut accumulator,
            &positioned.image,
            positioned.mask.as_ref(),
            &placed,
            &config.blend,
        );

        tracing::debug!(
            index = i,
            name = %positioned.name,
            luma_scale = stats.luma_scale,
            exposure_samples = stats.exposure_samples,
            contributing_pixels = stats.contributing_pixels,
            "Accumulated image"
        );

        if i == 0 {
            loop_start = placed.apply(top_center);
            loop_end = loop_start;
        } else if i == images.len() - 1 {
            loop_end = placed.apply(top_center);
        }

        reports.push(ImageReport {
            name: positioned.name.clone(),
            stats,
        });
    }

    let normalized = accumulator.normalize();
    let mosaic_dimensions = normalized.dimensions();

    let drift = if is_panorama_360 && config.drift_correction {
        DriftCorrection::between(loop_start, loop_end, source_height, mosaic_height)
    } else {
        DriftCorrection::none()
    };

    let output_width = if is_panorama_360 {
        let width = mosaic_width.saturating_sub(source_width);
        if width == 0 {
            tracing::warn!(
                mosaic_width,
                source_width,
                "360° crop removes the entire mosaic width"
            );
        }
        width
    } else {
        mosaic_width
    };

    let image = warp_global(&normalized, &drift.transform(), output_width, mosaic_height);

    tracing::info!(
        width = image.width(),
        height = image.height(),
        mosaic_width,
        mosaic_height,
        drift_slope = drift.slope,
        "Mosaic assembled"
    );

    Ok(MosaicResult {
        image,
        is_panorama_360,
        bounds,
        mosaic_dimensions,
        drift,
        images: reports,
    })
}

/// A sequence closes a loop when its first and last entries are distinct but
/// share a name. A lone image never closes a loop.
pub fn is_loop_closed(images: &[PositionedImage]) -> bool {
    match images {
        [first, .., last] => first.name == last.name,
        _ => false,
    }
}

/// Union of every image's projected box, using the first image's extent for all.
///
/// The maximum is seeded at the origin, so the frame never ends above or left
/// of `(0, 0)`.
fn union_bounds(images: &[PositionedImage], width: usize, height: usize) -> BoundingBox {
    let seed = BoundingBox::new(i32::MAX, i32::MAX, 0, 0);
    images
        .iter()
        .map(|positioned| compute_bounding_box(width, height, &positioned.transform))
        .fold(seed, |acc, bbox| acc.union(&bbox))
}

fn validate_inputs(images: &[PositionedImage]) -> Result<()> {
    let expected = images[0].image.dimensions();

    for (index, positioned) in images.iter().enumerate() {
        let actual = positioned.image.dimensions();
        if actual.channels != 3 {
            return Err(Error::UnsupportedChannels {
                index,
                channels: actual.channels,
            });
        }
        if !actual.same_extent(&expected) {
            return Err(Error::DimensionMismatch {
                index,
                expected,
                actual,
            });
        }
        if !positioned.transform.is_invertible() {
            return Err(Error::SingularTransform {
                index,
                name: positioned.name.clone(),
            });
        }
        let placement =
            try_compute_bounding_box(expected.width, expected.height, &positioned.transform);
        if placement.is_none() {
            return Err(Error::DegenerateProjection {
                index,
                name: positioned.name.clone(),
            });
        }
        if let Some(mask) = &positioned.mask {
            let mask_dims = mask.dimensions();
            let expected_mask = ImageDimensions::new(actual.width, actual.height, 1);
            if mask_dims != expected_mask {
                return Err(Error::MaskDimensionMismatch {
                    index,
                    expected: expected_mask,
                    actual: mask_dims,
                });
            }
        }
    }

    Ok(())
}
