//! Cropview Core - crop engine for an embeddable image-cropping widget
//!
//! A fixed-aspect crop window sits over a preview of the image. The user
//! drags, pinches and rotates the image beneath it; on commit the covered
//! region is decoded from the full-resolution source, composited onto a
//! fixed-size canvas and encoded.
//!
//! # Module Structure
//!
//! - `geometry` - rectangles, affine matrices and the baseline fit transforms
//! - `gesture` - the touch state machine and its lock-step matrix pair
//! - `transform` - crop resolution, sample sizes and compositing
//! - `session` - the front-end state a widget keeps between events
//! - `pipeline` - cancellable load and commit units
//! - `decode` / `encode` - image sources and output encoding
//!
//! # Usage
//!
//! ```ignore
//! use cropview_core::{load_image, commit_crop, CancelToken, CropConfig, CropSession};
//! use cropview_core::decode::EncodedImage;
//!
//! let config = CropConfig::with_output(512, 512);
//! let source = EncodedImage::from_path("photo.jpg")?;
//! let loaded = load_image(&source, config.preview_max_side, &CancelToken::new())?;
//!
//! let mut session = CropSession::new(config.clone())?;
//! session.show(&loaded)?;
//! session.set_viewport(1080, 1920);
//! // ... feed touch events ...
//! let result = session.crop_result()?;
//! let out = std::fs::File::create("crop.jpg")?;
//! commit_crop(&source, &result, &config, out, &CancelToken::new())?;
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod pipeline;
pub mod session;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use config::CropConfig;
pub use error::CropError;
pub use geometry::{AffineMatrix, Point, Rect, Rotation};
pub use gesture::{GestureState, GestureTransformState, MatrixPair, TouchEvent};
pub use pipeline::{commit_crop, load_image, CancelToken, CommitSummary, LoadedImage};
pub use session::CropSession;
pub use transform::{CropFrame, CropResult};
