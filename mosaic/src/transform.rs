//! Projective 2D transforms in homogeneous coordinates.

use glam::{DMat3, DVec2};

/// Determinant magnitude below which a transform counts as singular.
///
/// Appropriate for pixel-scale coordinates (typical values 0-10000).
const SINGULAR_EPSILON: f64 = 1e-12;

/// 3x3 homogeneous transformation.
///
/// In row form:
/// ```text
/// | a  b  tx |
/// | c  d  ty |
/// | g  h  1  |
/// ```
/// A point `(x, y)` maps to `((a x + b y + tx) / w, (c x + d y + ty) / w)` with
/// `w = g x + h y + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: DMat3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.rows();
        write!(
            f,
            "[[{:.4}, {:.4}, {:.2}], [{:.4}, {:.4}, {:.2}], [{:.6}, {:.6}, {:.4}]]",
            r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2], r[2][0], r[2][1], r[2][2]
        )
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: DMat3::IDENTITY,
        }
    }

    /// Build from three rows.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self {
            matrix: DMat3::from_cols_array_2d(&rows).transpose(),
        }
    }

    pub fn translation(t: DVec2) -> Self {
        Self::from_rows([[1.0, 0.0, t.x], [0.0, 1.0, t.y], [0.0, 0.0, 1.0]])
    }

    pub fn scale(s: DVec2) -> Self {
        Self::from_rows([[s.x, 0.0, 0.0], [0.0, s.y, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Vertical shear: `y' = y + k * x`.
    pub fn shear_y(k: f64) -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [k, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Affine transform from 6 parameters `[a, b, tx, c, d, ty]`.
    pub fn affine(params: [f64; 6]) -> Self {
        Self::from_rows([
            [params[0], params[1], params[2]],
            [params[3], params[4], params[5]],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Homography from 8 parameters (the 9th element is 1.0).
    pub fn homography(params: [f64; 8]) -> Self {
        Self::from_rows([
            [params[0], params[1], params[2]],
            [params[3], params[4], params[5]],
            [params[6], params[7], 1.0],
        ])
    }

    fn rows(&self) -> [[f64; 3]; 3] {
        self.matrix.transpose().to_cols_array_2d()
    }

    /// Map a point, including the homogeneous divide.
    #[inline]
    pub fn apply(&self, p: DVec2) -> DVec2 {
        let h = self.matrix * p.extend(1.0);
        DVec2::new(h.x / h.z, h.y / h.z)
    }

    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }

    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() > SINGULAR_EPSILON
    }

    /// Matrix inverse, or `None` if singular.
    pub fn try_inverse(&self) -> Option<Self> {
        if !self.is_invertible() {
            return None;
        }
        Some(Self {
            matrix: self.matrix.inverse(),
        })
    }

    /// Matrix inverse.
    ///
    /// # Panics
    /// Panics if the matrix is singular.
    pub fn inverse(&self) -> Self {
        self.try_inverse()
            .expect("Cannot invert singular transform matrix")
    }

    /// Compose two transforms: `self * other` (apply `other` first, then `self`).
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Whether the bottom row is `[0, 0, 1]`.
    pub fn is_affine(&self) -> bool {
        let r = self.rows();
        r[2][0] == 0.0 && r[2][1] == 0.0 && r[2][2] == 1.0
    }
}

impl std::ops::Mul for Transform {
    type Output = Transform;

    #[inline]
    fn mul(self, rhs: Transform) -> Transform {
        self.compose(&rhs)
    }
}
