//! Baseline display matrices: how an image (or the crop window) is fitted
//! into the viewport before any gesture is applied.
//!
//! Both builders share one policy: keep 1:1 scale if the content already fits
//! the viewport in both dimensions, otherwise scale down uniformly to fit,
//! and center the result.

use super::matrix::{AffineMatrix, TransformError};
use super::rect::Rect;
use serde::{Deserialize, Serialize};

/// Quarter-turn image rotation, as recorded in orientation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Snap any angle down to a quarter turn in `[0, 360)`.
    ///
    /// Negative angles wrap, so `-90` becomes `Deg270`.
    pub fn from_degrees(degrees: f32) -> Self {
        let quarter = ((degrees % 360.0) / 90.0) as i32;
        match quarter.rem_euclid(4) {
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            3 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> f32 {
        match self {
            Rotation::Deg0 => 0.0,
            Rotation::Deg90 => 90.0,
            Rotation::Deg180 => 180.0,
            Rotation::Deg270 => 270.0,
        }
    }

    /// True for rotations that swap width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Uniform scale that fits `content` into `viewport`, never enlarging.
fn fit_scale(content_w: f32, content_h: f32, viewport: &Rect) -> f32 {
    let (vw, vh) = (viewport.width(), viewport.height());
    if content_w <= vw && content_h <= vh {
        1.0
    } else {
        (vw / content_w).min(vh / content_h)
    }
}

/// Matrix that displays `image` rotated by `rotation`, fitted and centered in
/// `viewport`.
///
/// The rotation is about the origin, which moves the rotated image into
/// negative coordinates; the final translation compensates for that offset
/// so the scaled bounding box lands centered in the viewport.
pub fn image_to_screen(
    image: &Rect,
    viewport: &Rect,
    rotation: Rotation,
) -> Result<AffineMatrix, TransformError> {
    let mut m = AffineMatrix::rotate(rotation.degrees(), 0.0, 0.0);
    let rotated = m.map_rect(image);

    let scale = fit_scale(rotated.width(), rotated.height(), viewport);
    m.post_scale(scale, scale, 0.0, 0.0);
    m.ensure_finite()?;

    let dx = viewport.left + (viewport.width() - rotated.width() * scale) * 0.5
        - rotated.left * scale;
    let dy = viewport.top + (viewport.height() - rotated.height() * scale) * 0.5
        - rotated.top * scale;
    m.post_translate(dx, dy);
    m.ensure_finite()?;
    Ok(m)
}

/// Matrix that displays the crop window fitted and centered in `viewport`.
///
/// The crop window is always axis-aligned, whatever the image rotation.
pub fn crop_to_screen(crop: &Rect, viewport: &Rect) -> Result<AffineMatrix, TransformError> {
    let scale = fit_scale(crop.width(), crop.height(), viewport);
    let mut m = AffineMatrix::scale(scale, scale, 0.0, 0.0);
    m.ensure_finite()?;

    let dx = viewport.left + (viewport.width() - crop.width() * scale) * 0.5 - crop.left * scale;
    let dy = viewport.top + (viewport.height() - crop.height() * scale) * 0.5 - crop.top * scale;
    m.post_translate(dx, dy);
    m.ensure_finite()?;
    Ok(m)
}
