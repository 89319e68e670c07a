//! Shared test helpers: tracing setup and synthetic images.

use crate::image::{ByteImage, ImageDimensions, ValidityMask};

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn constant_image(width: usize, height: usize, rgb: [u8; 3]) -> ByteImage {
    ByteImage::from_fn(ImageDimensions::new(width, height, 3), |_, _, c| rgb[c])
}

/// Textured RGB image with every sample in `[1, 255]`, so no pixel is black.
pub fn gradient_image(width: usize, height: usize) -> ByteImage {
    ByteImage::from_fn(ImageDimensions::new(width, height, 3), |x, y, c| {
        (1 + (x * 5 + y * 3 + c * 40) % 255) as u8
    })
}

/// Horizontal crop `[x0, x0 + width)` of `scene`, as a pan across it would capture.
pub fn crop_columns(scene: &ByteImage, x0: usize, width: usize) -> ByteImage {
    let dims = ImageDimensions::new(width, scene.height(), scene.channels());
    ByteImage::from_fn(dims, |x, y, c| scene.get(x0 + x, y, c))
}

pub fn full_mask(width: usize, height: usize) -> ValidityMask {
    ValidityMask::new_filled(ImageDimensions::new(width, height, 1), true)
}
