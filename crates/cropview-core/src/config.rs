//! Session configuration.
//!
//! A plain serde struct so hosts can pass it across the WASM boundary as a JS
//! object, or load it from any serde format.

use crate::encode::{CompressPolicy, OutputFormat, DEFAULT_QUALITY};
use crate::error::CropError;
use serde::{Deserialize, Serialize};

/// Configuration for one crop session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Output width in pixels; also the crop window's aspect numerator.
    pub output_width: u32,
    /// Output height in pixels.
    pub output_height: u32,
    /// Requested output format name ("jpg", "png", "gif", ...).
    pub output_format: String,
    /// Compression quality (0 to 100). Ignored for PNG.
    pub quality: u8,
    /// RGB fill for output pixels the crop does not cover.
    pub background: [u8; 3],
    /// Horizontal margin between the viewport edge and the fitting area.
    pub margin_horizontal: f32,
    /// Vertical margin between the viewport edge and the fitting area.
    pub margin_vertical: f32,
    /// Longest side of the downsampled preview (usually the screen's longest
    /// side).
    pub preview_max_side: u32,
    /// Pinch distance below which zoom/rotate deltas are ignored.
    pub min_pinch_distance: f32,
    /// Smallest zoom, relative to the fitted display, that pinching can reach.
    pub min_gesture_scale: f32,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            output_width: 512,
            output_height: 512,
            output_format: "jpg".to_string(),
            quality: DEFAULT_QUALITY,
            background: [255, 255, 255],
            margin_horizontal: 0.0,
            margin_vertical: 0.0,
            preview_max_side: 2048,
            min_pinch_distance: 10.0,
            min_gesture_scale: 0.05,
        }
    }
}

impl CropConfig {
    /// Configuration for a given output size, other fields at their defaults.
    pub fn with_output(width: u32, height: u32) -> Self {
        Self {
            output_width: width,
            output_height: height,
            ..Self::default()
        }
    }

    /// Reject configurations no session can run with.
    pub fn validate(&self) -> Result<(), CropError> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err(CropError::InvalidConfig(format!(
                "output size {}x{} must be non-zero",
                self.output_width, self.output_height
            )));
        }
        if self.preview_max_side == 0 {
            return Err(CropError::InvalidConfig(
                "preview_max_side must be non-zero".to_string(),
            ));
        }
        if self.min_gesture_scale.is_nan() || self.min_gesture_scale <= 0.0 {
            return Err(CropError::InvalidConfig(format!(
                "min_gesture_scale must be positive, got {}",
                self.min_gesture_scale
            )));
        }
        Ok(())
    }

    /// Compression policy derived from the requested format and quality.
    pub fn compress_policy(&self) -> CompressPolicy {
        CompressPolicy {
            format: OutputFormat::from_requested(&self.output_format),
            quality: self.quality.min(100),
        }
    }
}
