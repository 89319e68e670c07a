//! Vertical drift removal for 360° panoramas.

use glam::DVec2;

use crate::transform::Transform;

/// Geometry of the drift correction applied to a mosaic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftCorrection {
    /// Top-edge midpoint of the leftmost loop endpoint, in mosaic coordinates.
    pub start: DVec2,
    /// Top-edge midpoint of the rightmost loop endpoint, in mosaic coordinates.
    pub end: DVec2,
    /// Shear factor `k` applied to the y coordinate.
    pub slope: f64,
    /// `source_height / mosaic_height`.
    pub vertical_scale: f64,
}

impl DriftCorrection {
    /// No correction.
    pub fn none() -> Self {
        Self {
            start: DVec2::ZERO,
            end: DVec2::ZERO,
            slope: 0.0,
            vertical_scale: 1.0,
        }
    }

    /// Correction that maps the line through `first` and `last` back to horizontal
    /// and rescales the mosaic height to the source height.
    ///
    /// The endpoints are ordered by x. A vertical or non-finite line yields slope 0.
    pub fn between(first: DVec2, last: DVec2, source_height: usize, mosaic_height: usize) -> Self {
        let (start, end) = if first.x > last.x { (last, first) } else { (first, last) };

        let mut slope = -(end.y - start.y) / (end.x - start.x);
        if !slope.is_finite() {
            tracing::warn!(
                start_x = start.x,
                end_x = end.x,
                "Loop endpoints share an x position, skipping drift shear"
            );
            slope = 0.0;
        }

        let vertical_scale = if mosaic_height > 0 {
            source_height as f64 / mosaic_height as f64
        } else {
            1.0
        };

        Self {
            start,
            end,
            slope,
            vertical_scale,
        }
    }

    /// Output-to-mosaic warp: `shear_y(slope) * scale(1, vertical_scale)`.
    pub fn transform(&self) -> Transform {
        Transform::shear_y(self.slope)
            .compose(&Transform::scale(DVec2::new(1.0, self.vertical_scale)))
    }

    pub fn is_identity(&self) -> bool {
        self.slope == 0.0 && self.vertical_scale == 1.0
    }
}

impl Default for DriftCorrection {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_slope_removes_linear_drift() {
        // Drifting down by 10 pixels over 400 columns.
        let drift =
            DriftCorrection::between(DVec2::new(50.0, 5.0), DVec2::new(450.0, 15.0), 100, 100);
        assert!((drift.slope - (-0.025)).abs() < EPSILON);
        assert!((drift.vertical_scale - 1.0).abs() < EPSILON);

        // Output y = y_start samples the mosaic along the drifting line.
        let t = drift.transform();
        let p = t.apply(DVec2::new(450.0, 15.0 + 450.0 * 0.025));
        assert!((p.y - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_endpoints_are_ordered_by_x() {
        let a = DVec2::new(300.0, 2.0);
        let b = DVec2::new(20.0, 12.0);
        let drift = DriftCorrection::between(a, b, 50, 60);
        assert_eq!(drift.start, b);
        assert_eq!(drift.end, a);
        // slope = -(2 - 12) / (300 - 20)
        assert!((drift.slope - 10.0 / 280.0).abs() < EPSILON);
        assert!((drift.vertical_scale - 50.0 / 60.0).abs() < EPSILON);
    }

    #[test]
    fn test_coincident_x_gives_zero_slope() {
        let p = DVec2::new(40.0, 3.0);
        let drift = DriftCorrection::between(p, p, 20, 20);
        assert_eq!(drift.slope, 0.0);
        assert!(drift.is_identity());

        let drift = DriftCorrection::between(p, DVec2::new(40.0, 9.0), 20, 20);
        assert_eq!(drift.slope, 0.0);
    }

    #[test]
    fn test_transform_composition() {
        let drift = DriftCorrection {
            start: DVec2::ZERO,
            end: DVec2::ZERO,
            slope: 0.5,
            vertical_scale: 0.25,
        };
        let p = drift.transform().apply(DVec2::new(4.0, 8.0));
        // Scale first, then shear: y' = 0.5 * x + 0.25 * y.
        assert!((p.x - 4.0).abs() < EPSILON);
        assert!((p.y - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_none_is_identity_transform() {
        let t = DriftCorrection::none().transform();
        let p = t.apply(DVec2::new(12.5, -3.0));
        assert!((p - DVec2::new(12.5, -3.0)).length() < EPSILON);
    }
}
