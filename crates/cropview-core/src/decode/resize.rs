//! Resampling for previews and sampled region decodes.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target size, and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// image's dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("pixel buffer does not match dimensions".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Size of a `width` x `height` raster decoded at `sample_size`.
///
/// Each side is divided and rounded up, never below one pixel, matching what
/// a sampling decoder produces for a partial last block.
pub fn sampled_dimensions(width: u32, height: u32, sample_size: u32) -> (u32, u32) {
    let s = sample_size.max(1);
    (width.div_ceil(s).max(1), height.div_ceil(s).max(1))
}

/// Downsample an image by a power-of-two sample size.
///
/// A sample size of 1 (or 0) returns the image unchanged.
pub fn downsample(
    image: &DecodedImage,
    sample_size: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if sample_size <= 1 {
        return Ok(image.clone());
    }
    let (width, height) = sampled_dimensions(image.width, image.height, sample_size);
    resize(image, width, height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 64]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_resize_to_target() {
        let out = resize(&gradient(120, 40), 30, 10, FilterType::Bilinear).unwrap();
        assert_eq!((out.width, out.height), (30, 10));
        assert_eq!(out.pixels.len(), 30 * 10 * 3);
    }

    #[test]
    fn test_resize_rejects_zero_target() {
        let img = gradient(8, 8);
        assert!(matches!(
            resize(&img, 0, 4, FilterType::Nearest),
            Err(DecodeError::InvalidFormat)
        ));
        assert!(resize(&img, 4, 0, FilterType::Nearest).is_err());
    }

    #[test]
    fn test_sampled_dimensions_round_up() {
        assert_eq!(sampled_dimensions(4000, 3000, 2), (2000, 1500));
        assert_eq!(sampled_dimensions(101, 51, 2), (51, 26));
        assert_eq!(sampled_dimensions(3, 3, 8), (1, 1));
        assert_eq!(sampled_dimensions(10, 10, 0), (10, 10));
    }

    #[test]
    fn test_downsample_by_four() {
        let img = gradient(64, 32);
        let small = downsample(&img, 4, FilterType::Bilinear).unwrap();
        assert_eq!((small.width, small.height), (16, 8));
    }

    #[test]
    fn test_downsample_by_one_is_identity() {
        let img = gradient(10, 5);
        let same = downsample(&img, 1, FilterType::Nearest).unwrap();
        assert_eq!(same.pixels, img.pixels);
    }

    #[test]
    fn test_every_kernel_keeps_flat_color() {
        let flat = DecodedImage::filled(40, 20, [200, 100, 50]);
        for filter in [FilterType::Nearest, FilterType::Bilinear, FilterType::Lanczos3] {
            let out = downsample(&flat, 2, filter).unwrap();
            assert_eq!((out.width, out.height), (20, 10));
            assert_eq!(out.pixel(10, 5), [200, 100, 50]);
        }
    }
}
