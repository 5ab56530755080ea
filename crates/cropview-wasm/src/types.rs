//! JavaScript-facing wrappers around core values.

use cropview_core::decode::DecodedImage;
use cropview_core::AffineMatrix;
use wasm_bindgen::prelude::*;

/// The downsampled preview, ready to be put into an `ImageData`.
///
/// Pixels are RGB, 3 bytes per pixel, row-major. `pixels()` copies them out of
/// WASM memory; the host usually does this once per load.
#[wasm_bindgen]
pub struct JsPreviewImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsPreviewImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGB pixel data as a Uint8Array copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// RGBA pixel data with opaque alpha, the layout `ImageData` expects.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for rgb in self.pixels.chunks_exact(3) {
            out.extend_from_slice(rgb);
            out.push(255);
        }
        out
    }
}

impl JsPreviewImage {
    pub(crate) fn from_decoded(img: &DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels.clone(),
        }
    }
}

/// Matrix entries in the argument order of `CanvasRenderingContext2D.setTransform(a, b, c, d, e, f)`.
pub(crate) fn canvas_transform(m: &AffineMatrix) -> Vec<f32> {
    vec![m.sx, m.ky, m.kx, m.sy, m.tx, m.ty]
}
