//! Error types for mosaic assembly.

use thiserror::Error;

use crate::image::ImageDimensions;

/// Errors caused by malformed mosaic input.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Image {index} has {channels} channels, expected 3 (RGB)")]
    UnsupportedChannels { index: usize, channels: usize },

    #[error("Dimension mismatch for image {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        index: usize,
        expected: ImageDimensions,
        actual: ImageDimensions,
    },

    #[error("Transform of image {index} ('{name}') is not invertible")]
    SingularTransform { index: usize, name: String },

    #[error("Image {index} ('{name}') projects to infinity or outside the mosaic range")]
    DegenerateProjection { index: usize, name: String },

    #[error("Validity mask of image {index} is {actual}, expected {expected}")]
    MaskDimensionMismatch {
        index: usize,
        expected: ImageDimensions,
        actual: ImageDimensions,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
