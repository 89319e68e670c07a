//! Sub-pixel sampling of interleaved images.
//!
//! Neighbour indices are clamped to the last row/column, so any coordinate inside
//! `[0, width) x [0, height)` is defined. Callers are expected to bounds-check
//! before sampling; coordinates outside the image are clamped to the border.

use crate::image::Image;

/// Bilinear interpolation of one channel at `(x, y)`.
#[inline]
pub fn bilinear_sample<T: Copy + Into<f64>>(
    image: &Image<T>,
    x: f64,
    y: f64,
    channel: usize,
) -> f64 {
    debug_assert!(!image.is_empty(), "cannot sample an empty image");
    let max_x = image.width() - 1;
    let max_y = image.height() - 1;

    let xf = x.floor();
    let yf = y.floor();
    let fx = x - xf;
    let fy = y - yf;

    let x0 = (xf.max(0.0) as usize).min(max_x);
    let y0 = (yf.max(0.0) as usize).min(max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);

    let p00: f64 = image.get(x0, y0, channel).into();
    let p10: f64 = image.get(x1, y0, channel).into();
    let p01: f64 = image.get(x0, y1, channel).into();
    let p11: f64 = image.get(x1, y1, channel).into();

    let top = p00 + fx * (p10 - p00);
    let bottom = p01 + fx * (p11 - p01);
    top + fy * (bottom - top)
}

/// Bilinear interpolation of channels 0..3.
#[inline]
pub fn bilinear_sample_rgb<T: Copy + Into<f64>>(image: &Image<T>, x: f64, y: f64) -> [f64; 3] {
    [
        bilinear_sample(image, x, y, 0),
        bilinear_sample(image, x, y, 1),
        bilinear_sample(image, x, y, 2),
    ]
}

/// Nearest integer pixel to `(x, y)`, halves rounded away from zero, clamped to
/// the image.
#[inline]
pub fn nearest_pixel<T: Copy>(image: &Image<T>, x: f64, y: f64) -> (usize, usize) {
    let ix = (x.round().max(0.0) as usize).min(image.width().saturating_sub(1));
    let iy = (y.round().max(0.0) as usize).min(image.height().saturating_sub(1));
    (ix, iy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ByteImage, FloatImage, ImageDimensions};

    const EPSILON: f64 = 1e-9;

    /// 2x2 single-channel image: [[0, 10], [20, 30]].
    fn quad() -> FloatImage {
        FloatImage::from_pixels(ImageDimensions::new(2, 2, 1), vec![0.0, 10.0, 20.0, 30.0])
    }

    #[test]
    fn test_exact_at_integer_coordinates() {
        let img = quad();
        assert!((bilinear_sample(&img, 0.0, 0.0, 0) - 0.0).abs() < EPSILON);
        assert!((bilinear_sample(&img, 1.0, 0.0, 0) - 10.0).abs() < EPSILON);
        assert!((bilinear_sample(&img, 0.0, 1.0, 0) - 20.0).abs() < EPSILON);
        assert!((bilinear_sample(&img, 1.0, 1.0, 0) - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_center_is_average() {
        let img = quad();
        assert!((bilinear_sample(&img, 0.5, 0.5, 0) - 15.0).abs() < EPSILON);
    }

    #[test]
    fn test_linear_along_edge() {
        let img = quad();
        assert!((bilinear_sample(&img, 0.25, 0.0, 0) - 2.5).abs() < EPSILON);
        assert!((bilinear_sample(&img, 0.0, 0.75, 0) - 15.0).abs() < EPSILON);
    }

    #[test]
    fn test_last_column_clamps() {
        let img = quad();
        // x in [w-1, w) reuses the last column as its right neighbour.
        assert!((bilinear_sample(&img, 1.5, 0.0, 0) - 10.0).abs() < EPSILON);
        assert!((bilinear_sample(&img, 1.5, 1.5, 0) - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_rgb_channels_are_independent() {
        let img = ByteImage::from_fn(ImageDimensions::new(2, 1, 3), |x, _, c| {
            (x as u8 * 100) + c as u8
        });
        let rgb = bilinear_sample_rgb(&img, 0.5, 0.0);
        assert!((rgb[0] - 50.0).abs() < EPSILON);
        assert!((rgb[1] - 51.0).abs() < EPSILON);
        assert!((rgb[2] - 52.0).abs() < EPSILON);
    }

    #[test]
    fn test_nearest_pixel() {
        let img = ByteImage::new_default(ImageDimensions::new(4, 3, 3));
        assert_eq!(nearest_pixel(&img, 1.5, 0.49), (2, 0));
        assert_eq!(nearest_pixel(&img, 3.7, 2.6), (3, 2));
        assert_eq!(nearest_pixel(&img, -0.3, 0.0), (0, 0));
    }
}
