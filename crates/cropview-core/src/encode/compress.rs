//! Compression of the cropped output to JPEG or PNG.
//!
//! Uses the `image` crate's encoders. The format is chosen from the host's
//! requested format name, and quality only applies to JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Default compression quality for JPEG output.
pub const DEFAULT_QUALITY: u8 = 90;

/// Errors that can occur while compressing or writing the output.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },

    /// Writing the encoded bytes to the sink failed
    #[error("Writing output failed: {0}")]
    WriteFailed(#[from] std::io::Error),
}

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Map a requested format name to a supported output format.
    ///
    /// "png" and "gif" (any case) select PNG, since GIF output is not
    /// supported and PNG is the lossless fallback. Everything else is JPEG.
    pub fn from_requested(name: &str) -> Self {
        if name.eq_ignore_ascii_case("png") || name.eq_ignore_ascii_case("gif") {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// How the output is compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressPolicy {
    pub format: OutputFormat,
    /// 0 to 100; JPEG clamps the low end to 1.
    pub quality: u8,
}

impl Default for CompressPolicy {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Encode an RGB image according to `policy`.
pub fn encode_image(image: &DecodedImage, policy: &CompressPolicy) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    write_image(image, policy, &mut buffer)?;
    Ok(buffer)
}

/// Encode an RGB image and write it to `sink`, flushing at the end.
pub fn write_image<W: Write>(
    image: &DecodedImage,
    policy: &CompressPolicy,
    mut sink: W,
) -> Result<(), EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if image.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    let format = policy.format;
    let result = match format {
        OutputFormat::Jpeg => {
            let quality = policy.quality.clamp(1, 100);
            JpegEncoder::new_with_quality(&mut sink, quality).write_image(
                &image.pixels,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Png => PngEncoder::new(&mut sink).write_image(
            &image.pixels,
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|e| match e {
        image::ImageError::IoError(io) => EncodeError::WriteFailed(io),
        other => EncodeError::EncodingFailed {
            format,
            message: other.to_string(),
        },
    })?;

    sink.flush()?;
    Ok(())
}
