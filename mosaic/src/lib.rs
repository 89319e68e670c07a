//! Mosaic - panorama blending library.
//!
//! Combines a horizontally ordered sequence of overlapping RGB images, each
//! positioned by a projective transform, into a single panorama:
//! - Feathered (linear ramp) blending of overlaps
//! - Per-image exposure compensation from overlap luminance
//! - 360° loop detection with seam cropping and vertical drift removal
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mosaic::{build_mosaic, PositionedImage, Transform};
//!
//! let images = vec![
//!     PositionedImage::new(left, Transform::identity(), "left"),
//!     PositionedImage::new(right, Transform::translation(DVec2::new(380.0, 2.0)), "right"),
//! ];
//! let panorama = build_mosaic(&images, 50.0)?;
//! ```

pub mod assemble;
pub(crate) mod bbox;
pub mod blend;
pub mod config;
pub mod error;
pub mod image;
pub(crate) mod interpolation;
pub mod transform;
pub(crate) mod warp;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Core types
// ============================================================================

pub use error::{Error, Result};
pub use image::{ByteImage, FloatImage, Image, ImageDimensions, ValidityMask};
pub use transform::Transform;

// ============================================================================
// Assembly
// ============================================================================

pub use assemble::{
    assemble, build_mosaic, is_loop_closed, DriftCorrection, ImageReport, MosaicResult,
    PositionedImage,
};
pub use config::{BlendConfig, MosaicConfig};

// ============================================================================
// Building blocks
// ============================================================================

pub use bbox::{compute_bounding_box, BoundingBox};
pub use blend::{accumulate, feather_weight, luma, AccumulationStats, Accumulator};
pub use interpolation::{bilinear_sample, bilinear_sample_rgb};
pub use warp::warp_global;
