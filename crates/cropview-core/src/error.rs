//! Error taxonomy for crop sessions.
//!
//! Every variant is terminal for the operation that produced it (a load or a
//! commit); nothing here is retried automatically. The `Display` text is the
//! short diagnostic surfaced to the host.

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::geometry::TransformError;
use thiserror::Error;

/// Errors reported by the crop engine and its pipeline units.
#[derive(Debug, Error)]
pub enum CropError {
    /// The source could not be read, or reported zero-area bounds.
    #[error("Could not load image for cropping: {0}")]
    LoadFailure(String),

    /// The session configuration cannot be used.
    #[error("Invalid crop configuration: {0}")]
    InvalidConfig(String),

    /// A matrix the crop depends on has no inverse.
    #[error("Cannot compute crop: {0}")]
    SingularTransform(#[from] TransformError),

    /// The crop window does not overlap the image.
    #[error("Nothing to crop: crop window is outside the image")]
    EmptyCrop,

    /// The region decoder could not be opened or returned no pixels.
    #[error("Region decode failed: {0}")]
    DecodeFailure(#[from] DecodeError),

    /// Compressing or writing the result failed.
    #[error("Encoding crop result failed: {0}")]
    EncodeFailure(#[from] EncodeError),

    /// A crop was requested before an image was displayed.
    #[error("No image is displayed yet")]
    NotReady,

    /// The unit was cancelled by its host before completing.
    #[error("Operation cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error_converts_to_singular() {
        let err: CropError = TransformError::Singular.into();
        assert!(matches!(err, CropError::SingularTransform(_)));
        assert_eq!(
            err.to_string(),
            "Cannot compute crop: matrix is singular and cannot be inverted"
        );
    }

    #[test]
    fn test_decode_error_converts() {
        let err: CropError = DecodeError::InvalidFormat.into();
        assert!(matches!(err, CropError::DecodeFailure(_)));
    }

    #[test]
    fn test_empty_crop_message() {
        assert_eq!(
            CropError::EmptyCrop.to_string(),
            "Nothing to crop: crop window is outside the image"
        );
    }
}
