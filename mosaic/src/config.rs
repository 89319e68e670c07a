//! Configuration types for mosaic blending.

use serde::{Deserialize, Serialize};

// =============================================================================
// Blend configuration
// =============================================================================

/// Per-image accumulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Width in destination pixels of the linear feather ramp at the left and
    /// right edge of each image.
    pub blend_width: f64,
    /// Scale each new image by its estimated exposure ratio to the existing mosaic.
    pub exposure_compensation: bool,
    /// Exposure ratios at or below this are treated as mismatched content.
    pub min_exposure_ratio: f64,
    /// Exposure ratios at or above this are treated as mismatched content.
    pub max_exposure_ratio: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            blend_width: 50.0,
            exposure_compensation: true,
            min_exposure_ratio: 0.5,
            max_exposure_ratio: 2.0,
        }
    }
}

impl BlendConfig {
    pub fn with_blend_width(mut self, blend_width: f64) -> Self {
        assert!(
            blend_width > 0.0 && blend_width.is_finite(),
            "Blend width must be positive and finite"
        );
        self.blend_width = blend_width;
        self
    }

    pub fn with_exposure_compensation(mut self, enabled: bool) -> Self {
        self.exposure_compensation = enabled;
        self
    }

    pub fn with_exposure_ratio_range(mut self, min: f64, max: f64) -> Self {
        self.min_exposure_ratio = min;
        self.max_exposure_ratio = max;
        self.validate();
        self
    }

    /// Validate configuration parameters.
    ///
    /// # Panics
    ///
    /// Panics if the blend width is not positive or the ratio range is empty.
    pub fn validate(&self) {
        assert!(
            self.blend_width > 0.0 && self.blend_width.is_finite(),
            "Blend width must be positive and finite"
        );
        assert!(
            self.min_exposure_ratio > 0.0,
            "Minimum exposure ratio must be positive"
        );
        assert!(
            self.min_exposure_ratio < self.max_exposure_ratio,
            "Exposure ratio range must be non-empty"
        );
    }

    /// Whether a luma ratio counts as a plausible exposure difference.
    #[inline]
    pub fn accepts_ratio(&self, ratio: f64) -> bool {
        ratio > self.min_exposure_ratio && ratio < self.max_exposure_ratio
    }
}

// =============================================================================
// Mosaic configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    pub blend: BlendConfig,
    /// Remove vertical drift from 360° panoramas with a shear/scale warp.
    /// Seam cropping is applied regardless.
    pub drift_correction: bool,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            blend: BlendConfig::default(),
            drift_correction: true,
        }
    }
}

impl MosaicConfig {
    /// Default config with the given blend width.
    pub fn with_blend_width(blend_width: f64) -> Self {
        Self {
            blend: BlendConfig::default().with_blend_width(blend_width),
            ..Default::default()
        }
    }

    pub fn with_blend(mut self, blend: BlendConfig) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_drift_correction(mut self, enabled: bool) -> Self {
        self.drift_correction = enabled;
        self
    }

    /// Validate configuration parameters.
    ///
    /// # Panics
    ///
    /// Panics if the blend configuration is invalid.
    pub fn validate(&self) {
        self.blend.validate();
    }
}
