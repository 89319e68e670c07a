//! Weighted colour accumulation buffer and its normalization.

use crate::image::{ByteImage, FloatImage, ImageDimensions};

/// Number of accumulator channels: R, G, B weighted sums followed by the weight sum.
pub const ACCUMULATOR_CHANNELS: usize = 4;

const WEIGHT_CHANNEL: usize = 3;

/// Relative slack applied before flooring so `w * c / w` landing a few f32 ulps
/// below `c` still yields `c`.
const NORMALIZE_RELATIVE_TOLERANCE: f64 = 4.0 * f32::EPSILON as f64;

/// Float accumulator for feathered blending.
///
/// Each pixel holds `(sum w*R, sum w*G, sum w*B, sum w)`. Contributions only ever
/// add, so every channel is monotonically non-decreasing over a mosaic build.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    data: FloatImage,
}

impl Accumulator {
    /// Zero-initialized accumulator.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: FloatImage::new_default(ImageDimensions::new(
                width,
                height,
                ACCUMULATOR_CHANNELS,
            )),
        }
    }

    /// Wrap an existing 4-channel float image.
    pub fn from_image(data: FloatImage) -> Self {
        assert_eq!(
            data.channels(),
            ACCUMULATOR_CHANNELS,
            "accumulator image must have 4 channels"
        );
        Self { data }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn dimensions(&self) -> ImageDimensions {
        self.data.dimensions()
    }

    pub fn as_image(&self) -> &FloatImage {
        &self.data
    }

    /// Accumulated weight at `(x, y)`.
    #[inline]
    pub fn weight(&self, x: usize, y: usize) -> f32 {
        self.data.get(x, y, WEIGHT_CHANNEL)
    }

    /// Accumulated weighted colour sum at `(x, y)`.
    #[inline]
    pub fn color_sum(&self, x: usize, y: usize) -> [f32; 3] {
        let p = self.data.pixel(x, y);
        [p[0], p[1], p[2]]
    }

    /// Weight-normalized colour, or `None` where the accumulator holds no data
    /// (zero weight or an all-zero colour sum).
    #[inline]
    pub fn mean_color(&self, x: usize, y: usize) -> Option<[f64; 3]> {
        let p = self.data.pixel(x, y);
        let weight = p[WEIGHT_CHANNEL] as f64;
        if weight <= 0.0 || p[..3].iter().all(|&v| v == 0.0) {
            return None;
        }
        Some([
            p[0] as f64 / weight,
            p[1] as f64 / weight,
            p[2] as f64 / weight,
        ])
    }

    /// Add `weight * rgb` to the colour sums and `weight` to the weight sum.
    #[inline]
    pub fn add(&mut self, x: usize, y: usize, rgb: [f64; 3], weight: f64) {
        debug_assert!(weight >= 0.0, "accumulated weight must be non-negative");
        let p = self.data.pixel_mut(x, y);
        p[0] += (rgb[0] * weight) as f32;
        p[1] += (rgb[1] * weight) as f32;
        p[2] += (rgb[2] * weight) as f32;
        p[WEIGHT_CHANNEL] += weight as f32;
    }

    /// Divide accumulated colour by accumulated weight.
    ///
    /// Pixels with zero weight become black. Output is a 3-channel byte image of the
    /// same extent.
    pub fn normalize(&self) -> ByteImage {
        let dims = ImageDimensions::new(self.width(), self.height(), 3);
        let mut output = ByteImage::new_default(dims);

        for (src, dst) in self
            .data
            .pixels()
            .zip(output.data_mut().chunks_exact_mut(3))
        {
            let weight = src[WEIGHT_CHANNEL] as f64;
            if weight > 0.0 {
                for c in 0..3 {
                    let value = src[c] as f64 / weight;
                    dst[c] = (value + value.abs() * NORMALIZE_RELATIVE_TOLERANCE)
                        .floor()
                        .clamp(0.0, 255.0) as u8;
                }
            }
        }

        output
    }
}
