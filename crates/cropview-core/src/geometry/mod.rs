//! Geometry for the crop engine: rectangles, affine matrices, and the
//! baseline fit transforms.
//!
//! # Coordinate Spaces
//!
//! - **Original**: full-resolution source pixels
//! - **Image**: pixels of the downsampled preview bitmap
//! - **Screen**: viewport pixels the preview is drawn into
//! - **Output**: pixels of the fixed-size crop result
//!
//! Matrices in this crate map between these spaces; every inversion is
//! fallible and returns a [`TransformError`].

mod fit;
mod matrix;
mod rect;

pub use fit::{crop_to_screen, image_to_screen, Rotation};
pub use matrix::{AffineMatrix, ScaleToFit, TransformError};
pub use rect::{
    center_rect_on, clamp_points_to_rect, corners_from_rect, fix_aspect_ratio,
    fix_aspect_ratio_contained, inclusive_contains, intersection_of_rotated_and_axis_aligned,
    trap_to_rect, PixelRect, Point, Quad, Rect,
};

/// FILL-map `crop` from the `photo_bounds` frame into the `display_bounds`
/// frame.
///
/// Used to carry a crop computed on the preview bitmap over to the original
/// full-resolution bounds. Fails when `photo_bounds` has no area.
pub fn scaled_crop_bounds(
    crop: &Rect,
    photo_bounds: &Rect,
    display_bounds: &Rect,
) -> Result<Rect, TransformError> {
    let m = AffineMatrix::rect_to_rect(photo_bounds, display_bounds, ScaleToFit::Fill)?;
    Ok(m.map_rect(crop))
}
