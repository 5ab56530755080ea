//! Image sources: bounds probing, preview loading and region decoding.
//!
//! The crop engine never needs the full-resolution raster at once. It asks a
//! source for its stored size and orientation, a downsampled preview to show
//! during interaction, and at commit time a region decoder that produces only
//! the cropped rectangle at a chosen sample size.

use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use super::exif::read_orientation;
use super::resize::downsample;
use super::{DecodeError, DecodedImage, FilterType, ImageMetadata};
use crate::geometry::PixelRect;
use crate::transform::preview_sample_size;

/// Decodes sub-rectangles of one source image.
pub trait RegionDecoder {
    /// Stored (unrotated) size of the image this decoder reads.
    fn dimensions(&self) -> (u32, u32);

    /// Decode `region` (stored pixel coordinates) downsampled by
    /// `sample_size`.
    ///
    /// The region must lie inside [`RegionDecoder::dimensions`] and be
    /// non-empty.
    fn decode_region(
        &mut self,
        region: PixelRect,
        sample_size: u32,
    ) -> Result<DecodedImage, DecodeError>;
}

/// A source image the crop engine can load and commit against.
pub trait ImageSource {
    /// Stored size and EXIF orientation, without decoding pixels.
    fn metadata(&self) -> Result<ImageMetadata, DecodeError>;

    /// Decode a raster whose longer side does not exceed `max_side`,
    /// unrotated.
    fn load_preview(&self, max_side: u32) -> Result<DecodedImage, DecodeError>;

    /// Open a decoder for full-resolution regions of this source.
    fn open_region_decoder(&self) -> Result<Box<dyn RegionDecoder + '_>, DecodeError>;
}

/// An encoded JPEG or PNG held in memory.
///
/// Both the preview and the region decoder decode the whole image into
/// memory first, because `image` cannot decode a sub-rectangle. For very
/// large sources, implement [`ImageSource`] and [`RegionDecoder`] over a
/// decoder that can.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Read a file fully into memory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| DecodeError::IoError(e.to_string()))?;
        Ok(Self::new(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn reader(&self) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
        let reader = ImageReader::new(Cursor::new(self.bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| DecodeError::IoError(e.to_string()))?;
        if reader.format().is_none() {
            return Err(DecodeError::InvalidFormat);
        }
        Ok(reader)
    }

    /// Decode the whole image, ignoring orientation.
    fn decode_full(&self) -> Result<DecodedImage, DecodeError> {
        let img = self
            .reader()?
            .decode()
            .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
        Ok(DecodedImage::from_rgb_image(img.into_rgb8()))
    }
}

impl ImageSource for EncodedImage {
    fn metadata(&self) -> Result<ImageMetadata, DecodeError> {
        let (width, height) = self
            .reader()?
            .into_dimensions()
            .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
        Ok(ImageMetadata {
            width,
            height,
            orientation: read_orientation(&self.bytes),
        })
    }

    fn load_preview(&self, max_side: u32) -> Result<DecodedImage, DecodeError> {
        let full = self.decode_full()?;
        let sample = preview_sample_size(full.width, full.height, max_side);
        log::debug!(
            "preview of {}x{} image at sample size {}",
            full.width,
            full.height,
            sample
        );
        downsample(&full, sample, FilterType::Bilinear)
    }

    fn open_region_decoder(&self) -> Result<Box<dyn RegionDecoder + '_>, DecodeError> {
        Ok(Box::new(BufferedRegionDecoder {
            image: self.decode_full()?,
        }))
    }
}

/// Region decoder over a fully decoded raster.
///
/// The `image` crate has no partial decode, so the source is decoded once
/// when the decoder is opened and regions are cut from that buffer.
pub struct BufferedRegionDecoder {
    image: DecodedImage,
}

impl BufferedRegionDecoder {
    pub fn new(image: DecodedImage) -> Self {
        Self { image }
    }
}

impl RegionDecoder for BufferedRegionDecoder {
    fn dimensions(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    fn decode_region(
        &mut self,
        region: PixelRect,
        sample_size: u32,
    ) -> Result<DecodedImage, DecodeError> {
        let (width, height) = self.dimensions();
        if region.is_empty() || region.clamp_to(width, height) != region {
            return Err(DecodeError::RegionOutOfBounds {
                region,
                width,
                height,
            });
        }

        let rgb = self
            .image
            .to_rgb_image()
            .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;
        let cropped = image::imageops::crop_imm(
            &rgb,
            region.left as u32,
            region.top as u32,
            region.width() as u32,
            region.height() as u32,
        )
        .to_image();

        let decoded = downsample(
            &DecodedImage::from_rgb_image(cropped),
            sample_size,
            FilterType::Bilinear,
        )?;
        if decoded.is_empty() {
            return Err(DecodeError::EmptyRegion);
        }
        Ok(decoded)
    }
}
