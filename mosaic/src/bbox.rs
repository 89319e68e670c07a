//! Destination-frame bounding boxes of projected images.

use glam::DVec2;

use crate::image::Image;
use crate::transform::Transform;

/// Integer axis-aligned bounding box in destination coordinates.
///
/// `max_x` / `max_y` are the rounded far edges of the projected rectangle, so a box
/// of an unwarped `w x h` image is `(0, 0, w, h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounding box of `image` projected through `transform`.
    pub fn of_image<T: Copy>(image: &Image<T>, transform: &Transform) -> Self {
        compute_bounding_box(image.width(), image.height(), transform)
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Largest projected corner coordinate, in pixels, accepted as a real placement.
pub const MAX_PROJECTED_COORDINATE: f64 = (1u32 << 20) as f64;

/// Project the four corners of a `width x height` rectangle and return their
/// rounded axis-aligned extent.
///
/// Only corners are considered, which is exact for affine transforms and a close
/// approximation for mild homographies. Corners that land at infinity saturate;
/// use [`try_compute_bounding_box`] to reject them instead.
pub fn compute_bounding_box(width: usize, height: usize, transform: &Transform) -> BoundingBox {
    let corners = projected_corners(width, height, transform);
    let min = corners.iter().copied().fold(DVec2::INFINITY, DVec2::min);
    let max = corners.iter().copied().fold(DVec2::NEG_INFINITY, DVec2::max);

    BoundingBox {
        min_x: round_half_away(min.x),
        min_y: round_half_away(min.y),
        max_x: round_half_away(max.x),
        max_y: round_half_away(max.y),
    }
}

/// Like [`compute_bounding_box`], but `None` if any corner is not finite or lies
/// beyond [`MAX_PROJECTED_COORDINATE`].
pub fn try_compute_bounding_box(
    width: usize,
    height: usize,
    transform: &Transform,
) -> Option<BoundingBox> {
    let corners = projected_corners(width, height, transform);
    let limit = DVec2::splat(MAX_PROJECTED_COORDINATE);
    // NaN fails both comparisons.
    let in_range = corners
        .iter()
        .all(|c| c.cmpge(-limit).all() && c.cmple(limit).all());
    in_range.then(|| compute_bounding_box(width, height, transform))
}

fn projected_corners(width: usize, height: usize, transform: &Transform) -> [DVec2; 4] {
    let w = width as f64;
    let h = height as f64;
    [
        DVec2::new(0.0, 0.0),
        DVec2::new(0.0, h),
        DVec2::new(w, 0.0),
        DVec2::new(w, h),
    ]
    .map(|c| transform.apply(c))
}

/// Nearest integer, halves rounded away from zero.
#[inline]
pub(crate) fn round_half_away(v: f64) -> i32 {
    v.round() as i32
}
