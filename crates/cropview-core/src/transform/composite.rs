//! Drawing a decoded region onto the fixed-size output canvas.
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel center, the compositing matrix is
//! inverted to find the source position, and the four nearest source pixels
//! are blended bilinearly. Output pixels whose source position falls outside
//! the decoded region keep the background color.

use crate::decode::DecodedImage;
use crate::geometry::{AffineMatrix, Point, TransformError};

/// Rasterizer for the committed crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
}

impl Compositor {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        Self {
            width,
            height,
            background,
        }
    }

    /// Draw `source` through `matrix` (source pixels → output pixels) onto a
    /// background-filled canvas.
    pub fn composite(
        &self,
        source: &DecodedImage,
        matrix: &AffineMatrix,
    ) -> Result<DecodedImage, TransformError> {
        let inverse = matrix.invert()?;
        let mut canvas = DecodedImage::filled(self.width, self.height, self.background);
        if source.is_empty() {
            return Ok(canvas);
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let src = inverse.map_point(Point::new(x as f32 + 0.5, y as f32 + 0.5));
                if let Some(pixel) = sample_bilinear(source, src.x as f64, src.y as f64) {
                    let idx = (y as usize * self.width as usize + x as usize) * 3;
                    canvas.pixels[idx..idx + 3].copy_from_slice(&pixel);
                }
            }
        }
        Ok(canvas)
    }
}

/// Get a pixel as [f64; 3] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &DecodedImage, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation at a continuous position
/// where pixel `i` covers `[i, i + 1)`.
///
/// Returns `None` outside the image. Near the edges the nearest row or
/// column is repeated.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> Option<[u8; 3]> {
    let (w, h) = (image.width as f64, image.height as f64);
    if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
        return None;
    }

    // Shift to pixel-center coordinates.
    let cx = (x - 0.5).clamp(0.0, w - 1.0);
    let cy = (y - 0.5).clamp(0.0, h - 1.0);

    let x0 = cx.floor() as usize;
    let y0 = cy.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    // Fractional distances
    let fx = cx - x0 as f64;
    let fy = cy - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    Some(result)
}
