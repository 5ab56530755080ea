//! Decode sample sizes and the compositing matrix.
//!
//! A sample size `s` means the decoder keeps one pixel in `s` along each
//! axis. Sizes are always powers of two.

use crate::geometry::{AffineMatrix, Rect, ScaleToFit, TransformError};

/// Largest power-of-two sample size that keeps a decoded region at least
/// as large as the target in both dimensions.
///
/// Stays at 1 unless the region is larger than the target in some
/// dimension. Integer division throughout, so equality stops the search.
pub fn sample_size(region_w: u32, region_h: u32, target_w: u32, target_h: u32) -> u32 {
    let mut sample = 1u32;
    if region_h > target_h || region_w > target_w {
        let half_h = region_h / 2;
        let half_w = region_w / 2;
        while half_h / sample > target_h && half_w / sample > target_w {
            sample *= 2;
        }
    }
    sample
}

/// Sample size for a preview whose longer side fits `max_side`.
///
/// Halves the longer side until it fits, doubling the sample each time.
pub fn preview_sample_size(width: u32, height: u32, max_side: u32) -> u32 {
    let mut side = width.max(height);
    let mut sample = 1u32;
    while side > max_side {
        side >>= 1;
        sample <<= 1;
    }
    sample
}

/// Matrix that draws a decoded region onto the output canvas.
///
/// Three stages, each post-concatenated onto the previous one:
/// 1. decoded raster → the region it covers in preview pixels,
/// 2. preview → screen through the display matrix at commit,
/// 3. the on-screen crop window → the output canvas.
pub fn compositing_matrix(
    decoded: &Rect,
    region_in_preview: &Rect,
    display_image: &AffineMatrix,
    display_crop: &Rect,
    output: &Rect,
) -> Result<AffineMatrix, TransformError> {
    let mut m = AffineMatrix::rect_to_rect(decoded, region_in_preview, ScaleToFit::Fill)?;
    m.post_concat(display_image);
    m.post_concat(&AffineMatrix::rect_to_rect(
        display_crop,
        output,
        ScaleToFit::Fill,
    )?);
    m.ensure_finite()?;
    Ok(m)
}
