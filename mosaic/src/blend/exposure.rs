//! Exposure (luma ratio) estimation between a new image and the mosaic so far.

/// Rec. 601 luma coefficients.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

#[inline]
pub fn luma(rgb: [f64; 3]) -> f64 {
    LUMA_WEIGHTS[0] * rgb[0] + LUMA_WEIGHTS[1] * rgb[1] + LUMA_WEIGHTS[2] * rgb[2]
}

/// Running average of accepted `mosaic_luma / image_luma` ratios, seeded with a
/// ratio of 1.0 so an image with no usable overlap keeps its exposure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LumaEstimate {
    sum: f64,
    count: usize,
}

impl LumaEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one ratio sample.
    #[inline]
    pub fn add(&mut self, ratio: f64) {
        self.sum += ratio;
        self.count += 1;
    }

    /// Number of accepted samples.
    pub fn samples(&self) -> usize {
        self.count
    }

    /// `(1 + sum) / (1 + count)`.
    pub fn scale(&self) -> f64 {
        (1.0 + self.sum) / (1 + self.count) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_of_white_and_primaries() {
        assert!((luma([255.0, 255.0, 255.0]) - 255.0).abs() < 1e-9);
        assert!((luma([100.0, 0.0, 0.0]) - 29.9).abs() < 1e-9);
        assert!((luma([0.0, 100.0, 0.0]) - 58.7).abs() < 1e-9);
        assert!((luma([0.0, 0.0, 100.0]) - 11.4).abs() < 1e-9);
    }

    #[test]
    fn test_no_samples_is_unity() {
        let estimate = LumaEstimate::new();
        assert_eq!(estimate.samples(), 0);
        assert!((estimate.scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_sample_is_pulled_toward_one() {
        let mut estimate = LumaEstimate::new();
        estimate.add(1.5);
        assert!((estimate.scale() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_converges_to_constant_ratio() {
        let mut estimate = LumaEstimate::new();
        for _ in 0..10_000 {
            estimate.add(1.6);
        }
        assert_eq!(estimate.samples(), 10_000);
        assert!((estimate.scale() - 1.6).abs() < 1e-3);
    }
}
