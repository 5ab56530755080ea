//! Values shared by image sources, decoders and resamplers.

use crate::geometry::{PixelRect, Rotation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for probing and decoding image sources.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The requested region does not lie inside the image.
    #[error("Region {region:?} is outside the {width}x{height} image")]
    RegionOutOfBounds {
        region: PixelRect,
        width: u32,
        height: u32,
    },

    /// The decoder produced no pixels for the requested region.
    #[error("Decoder returned an empty region")]
    EmptyRegion,
}

/// Resampling kernel used when a decoded region is shrunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    Nearest,
    #[default]
    Bilinear,
    Lanczos3,
}

impl FilterType {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType as Kernel;
        match self {
            FilterType::Nearest => Kernel::Nearest,
            FilterType::Bilinear => Kernel::Triangle,
            FilterType::Lanczos3 => Kernel::Lanczos3,
        }
    }
}

/// The EXIF `Orientation` tag. Discriminants are the tag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    Mirrored = 2,
    UpsideDown = 3,
    MirroredUpsideDown = 4,
    MirroredQuarterLeft = 5,
    QuarterRight = 6,
    MirroredQuarterRight = 7,
    QuarterLeft = 8,
}

impl Orientation {
    /// Clockwise rotation that makes the stored pixels upright.
    ///
    /// Mirrored variants map to no rotation; the crop engine cannot flip.
    pub fn rotation(self) -> Rotation {
        match self {
            Orientation::QuarterRight => Rotation::Deg90,
            Orientation::UpsideDown => Rotation::Deg180,
            Orientation::QuarterLeft => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }
}

impl From<u32> for Orientation {
    /// Unknown tag values read as `Normal`.
    fn from(tag: u32) -> Self {
        const ALL: [Orientation; 8] = [
            Orientation::Normal,
            Orientation::Mirrored,
            Orientation::UpsideDown,
            Orientation::MirroredUpsideDown,
            Orientation::MirroredQuarterLeft,
            Orientation::QuarterRight,
            Orientation::MirroredQuarterRight,
            Orientation::QuarterLeft,
        ];
        tag.checked_sub(1)
            .and_then(|i| ALL.get(i as usize))
            .copied()
            .unwrap_or_default()
    }
}

/// What a source reports before any pixels are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Stored width, before orientation is applied.
    pub width: u32,
    /// Stored height, before orientation is applied.
    pub height: u32,
    pub orientation: Orientation,
}

/// Packed RGB8 pixels, row-major, `width * height * 3` bytes.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Solid canvas of one color.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let pixels = color.repeat(width as usize * height as usize);
        Self::new(width, height, pixels)
    }

    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// `None` when the buffer length does not match the dimensions.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// RGB at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
