//! From gesture state to output pixels.
//!
//! # Commit Order
//!
//! 1. Resolve the crop window to preview pixels and original pixels
//! 2. Pick a decode sample size for the region
//! 3. Build the compositing matrix (decoded region → output canvas)
//! 4. Rasterize onto a background-filled canvas
//!
//! # Coordinate System
//!
//! - Crop rectangles are in pixels of the space they name (preview, original,
//!   screen or output)
//! - Origin is the top-left corner, y grows downward
//! - Positive rotation angles turn clockwise on screen

mod composite;
mod resolve;
mod sample;

pub use composite::Compositor;
pub use resolve::{resolve_crop, CropFrame, CropResult};
pub use sample::{compositing_matrix, preview_sample_size, sample_size};
