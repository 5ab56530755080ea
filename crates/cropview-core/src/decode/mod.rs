//! Image sources for the crop engine.
//!
//! This module provides:
//! - Bounds and EXIF orientation probing without a full decode
//! - Downsampled preview loading under a maximum side length
//! - Region decoding at a power-of-two sample size
//!
//! # Architecture
//!
//! Sources sit behind the [`ImageSource`] and [`RegionDecoder`] traits so a
//! host with a true partial decoder can plug it in. [`EncodedImage`] is the
//! in-memory implementation built on the `image` crate.
//!
//! # Examples
//!
//! ```ignore
//! use cropview_core::decode::{EncodedImage, ImageSource};
//!
//! let source = EncodedImage::from_path("photo.jpg")?;
//! let meta = source.metadata()?;
//! let preview = source.load_preview(2048)?;
//! println!("{}x{} shown as {}x{}", meta.width, meta.height, preview.width, preview.height);
//! ```

mod exif;
mod resize;
mod source;
mod types;

pub use exif::read_orientation;
pub use resize::{downsample, resize, sampled_dimensions};
pub use source::{BufferedRegionDecoder, EncodedImage, ImageSource, RegionDecoder};
pub use types::{DecodeError, DecodedImage, FilterType, ImageMetadata, Orientation};
