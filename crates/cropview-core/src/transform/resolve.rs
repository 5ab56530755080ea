//! Resolving the on-screen crop window to image pixels.
//!
//! The image moves under a fixed crop window. To find which pixels the
//! window covers, the window is carried back through the accumulated gesture
//! transform into the frame the image was first displayed in, clipped to the
//! displayed image, and then mapped back to preview pixels.

use crate::error::CropError;
use crate::geometry::{
    clamp_points_to_rect, corners_from_rect, scaled_crop_bounds, trap_to_rect, AffineMatrix,
    Rect,
};
use crate::gesture::MatrixPair;

/// The fixed geometry of one displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropFrame {
    /// Preview bounds, image-local.
    pub image_rect: Rect,
    /// Full-resolution bounds of the source.
    pub original_bounds: Rect,
    /// The crop window in its own space, `(0, 0, output_w, output_h)`.
    pub crop_rect: Rect,
    /// Image → screen before any gesture.
    pub initial_display: AffineMatrix,
    /// Crop window → screen.
    pub display_crop: AffineMatrix,
}

/// Everything the commit needs from the session, captured at commit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropResult {
    /// Preview bounds, image-local.
    pub raw_image_rect: Rect,
    /// The cropped region in preview pixels.
    pub raw_intersection_rect: Rect,
    /// Display matrix at the moment of commit.
    pub display_image_matrix: AffineMatrix,
    /// The crop window in screen coordinates.
    pub display_crop_rect: Rect,
    /// Full-resolution bounds of the source.
    pub original_bounds: Rect,
    /// The cropped region in full-resolution pixels.
    pub true_crop: Rect,
}

/// Compute the crop for the current gesture state.
///
/// # Errors
///
/// - `SingularTransform` when the gesture or initial matrix cannot be inverted
/// - `EmptyCrop` when the crop window does not overlap the image
pub fn resolve_crop(frame: &CropFrame, pair: &MatrixPair) -> Result<CropResult, CropError> {
    let initial_image = frame.initial_display.map_rect(&frame.image_rect);

    let mut crop_to_initial = pair.crop_inverse().invert()?;
    crop_to_initial.pre_concat(&frame.display_crop);
    let crop_quad = crop_to_initial.map_quad(&frame.crop_rect);

    let unrotated = trap_to_rect(&crop_quad.points);
    let mut corners = corners_from_rect(&unrotated).points;
    clamp_points_to_rect(&initial_image, &mut corners);
    let intersection = trap_to_rect(&corners);

    if intersection.is_empty() {
        log::debug!("crop window {:?} misses image {:?}", unrotated, initial_image);
        return Err(CropError::EmptyCrop);
    }

    let raw_intersection_rect = frame.initial_display.invert()?.map_rect(&intersection);
    let true_crop = scaled_crop_bounds(
        &raw_intersection_rect,
        &frame.image_rect,
        &frame.original_bounds,
    )?;

    log::debug!(
        "raw image {:?}, raw intersection {:?}, true crop {:?}",
        frame.image_rect,
        raw_intersection_rect,
        true_crop
    );

    Ok(CropResult {
        raw_image_rect: frame.image_rect,
        raw_intersection_rect,
        display_image_matrix: *pair.display(),
        display_crop_rect: frame.display_crop.map_rect(&frame.crop_rect),
        original_bounds: frame.original_bounds,
        true_crop,
    })
}
