//! Global image warp with bilinear resampling.
//!
//! The transform maps OUTPUT pixel coordinates to SOURCE coordinates:
//! `out(p) = src(transform.apply(p))`. Output pixels whose source position falls
//! outside the source image are left black.

use glam::DVec2;

use crate::image::{ByteImage, ImageDimensions};
use crate::interpolation::bilinear_sample;
use crate::transform::Transform;

/// Resample `src` into a `width x height` image.
pub fn warp_global(
    src: &ByteImage,
    transform: &Transform,
    width: usize,
    height: usize,
) -> ByteImage {
    let mut output = ByteImage::new_default(ImageDimensions::new(width, height, src.channels()));
    if src.is_empty() || output.is_empty() {
        return output;
    }

    for y in 0..height {
        warp_row(src, &mut output, y, transform);
    }
    output
}

/// Warp one output row.
///
/// Uses incremental coordinate stepping for affine transforms to avoid a
/// per-pixel matrix multiply.
fn warp_row(src: &ByteImage, output: &mut ByteImage, y: usize, transform: &Transform) {
    let max_x = (src.width() - 1) as f64;
    let max_y = (src.height() - 1) as f64;
    let can_step = transform.is_affine();

    let row_start = transform.apply(DVec2::new(0.0, y as f64));
    let step = transform.apply(DVec2::new(1.0, y as f64)) - row_start;
    let mut src_pos = row_start;

    for x in 0..output.width() {
        if !can_step {
            src_pos = transform.apply(DVec2::new(x as f64, y as f64));
        }

        // NaN coordinates fail every comparison and stay black.
        let inside =
            src_pos.x >= 0.0 && src_pos.x <= max_x && src_pos.y >= 0.0 && src_pos.y <= max_y;
        if inside {
            let pixel = output.pixel_mut(x, y);
            for (c, out) in pixel.iter_mut().enumerate() {
                *out = to_byte(bilinear_sample(src, src_pos.x, src_pos.y, c));
            }
        }

        if can_step {
            src_pos += step;
        }
    }
}

#[inline]
fn to_byte(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
