//! Interleaved multi-channel pixel grids.
//!
//! Pixels are stored row-major with channels interleaved:
//! sample `(x, y, c)` lives at `(y * width + x) * channels + c`.

use std::ops::{Index, IndexMut};

/// Width, height and channel count of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageDimensions {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl ImageDimensions {
    pub const fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    #[inline]
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub const fn sample_count(&self) -> usize {
        self.width * self.height * self.channels
    }

    /// Same width and height, ignoring channel count.
    #[inline]
    pub const fn same_extent(&self, other: &ImageDimensions) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl std::fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    dimensions: ImageDimensions,
    data: Vec<T>,
}

/// 8-bit image, channel values in [0, 255].
pub type ByteImage = Image<u8>;

/// Floating point image, used for the blend accumulator.
pub type FloatImage = Image<f32>;

/// Single-channel per-pixel validity flags.
pub type ValidityMask = Image<bool>;

impl<T: Copy + Default> Image<T> {
    /// Zero-filled (default-filled) image.
    pub fn new_default(dimensions: ImageDimensions) -> Self {
        Self {
            dimensions,
            data: vec![T::default(); dimensions.sample_count()],
        }
    }

    /// 0x0 image with the given channel count.
    pub fn empty(channels: usize) -> Self {
        Self::new_default(ImageDimensions::new(0, 0, channels))
    }
}

impl<T: Copy> Image<T> {
    pub fn from_pixels(dimensions: ImageDimensions, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            dimensions.sample_count(),
            "data length must equal width * height * channels"
        );
        Self { dimensions, data }
    }

    pub fn new_filled(dimensions: ImageDimensions, value: T) -> Self {
        Self {
            dimensions,
            data: vec![value; dimensions.sample_count()],
        }
    }

    /// Build an image by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn(
        dimensions: ImageDimensions,
        mut f: impl FnMut(usize, usize, usize) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(dimensions.sample_count());
        for y in 0..dimensions.height {
            for x in 0..dimensions.width {
                for c in 0..dimensions.channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self { dimensions, data }
    }

    #[inline]
    pub fn dimensions(&self) -> ImageDimensions {
        self.dimensions
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dimensions.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dimensions.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.dimensions.channels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width() && y < self.height());
        (y * self.dimensions.width + x) * self.dimensions.channels
    }

    /// All channels of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[T] {
        let start = self.offset(x, y);
        &self.data[start..start + self.dimensions.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [T] {
        let start = self.offset(x, y);
        let channels = self.dimensions.channels;
        &mut self.data[start..start + channels]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> T {
        debug_assert!(channel < self.channels());
        self.data[self.offset(x, y) + channel]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, channel: usize, value: T) {
        debug_assert!(channel < self.channels());
        let idx = self.offset(x, y) + channel;
        self.data[idx] = value;
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over pixels as channel slices, row-major.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.dimensions.channels.max(1))
    }
}

impl ByteImage {
    /// `true` if channels 0..3 of pixel `(x, y)` are all zero.
    #[inline]
    pub fn is_black(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y)[..3].iter().all(|&v| v == 0)
    }
}

impl<T: Copy> Index<(usize, usize, usize)> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y, c): (usize, usize, usize)) -> &Self::Output {
        &self.data[self.offset(x, y) + c]
    }
}

impl<T: Copy> IndexMut<(usize, usize, usize)> for Image<T> {
    #[inline]
    fn index_mut(&mut self, (x, y, c): (usize, usize, usize)) -> &mut Self::Output {
        let idx = self.offset(x, y) + c;
        &mut self.data[idx]
    }
}
