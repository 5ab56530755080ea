//! Output encoding for committed crops.
//!
//! This module provides:
//! - JPEG encoding with configurable quality
//! - PNG encoding for "png" and "gif" requests
//! - Writing to any `std::io::Write` sink
//!
//! # Examples
//!
//! ```ignore
//! use cropview_core::decode::DecodedImage;
//! use cropview_core::encode::{encode_image, CompressPolicy};
//!
//! let image = DecodedImage::filled(100, 100, [128, 128, 128]);
//! let jpeg_bytes = encode_image(&image, &CompressPolicy::default()).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod compress;

pub use compress::{
    encode_image, write_image, CompressPolicy, EncodeError, OutputFormat, DEFAULT_QUALITY,
};
