//! The two coarse units of work: loading an image and committing a crop.
//!
//! Both are plain synchronous functions that take their inputs by value or
//! shared reference and return immutable results, so the host can run them
//! on whatever worker it has. Each checks a [`CancelToken`] between stages;
//! a cancelled unit returns [`CropError::Cancelled`] and writes nothing.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::CropConfig;
use crate::decode::{DecodedImage, ImageMetadata, ImageSource};
use crate::encode::{write_image, OutputFormat};
use crate::error::CropError;
use crate::geometry::{scaled_crop_bounds, PixelRect, Rect, Rotation};
use crate::transform::{compositing_matrix, sample_size, Compositor, CropResult};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), CropError> {
        if self.is_cancelled() {
            Err(CropError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A source ready for display.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Downsampled, unrotated preview.
    pub preview: DecodedImage,
    /// Full-resolution bounds and orientation.
    pub metadata: ImageMetadata,
}

impl LoadedImage {
    pub fn rotation(&self) -> Rotation {
        self.metadata.orientation.rotation()
    }
}

/// What a successful commit produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// Full-resolution region that was decoded.
    pub region: PixelRect,
    pub sample_size: u32,
}

/// Probe bounds and orientation, then decode a preview whose longer side
/// fits `max_side`.
pub fn load_image<S: ImageSource + ?Sized>(
    source: &S,
    max_side: u32,
    cancel: &CancelToken,
) -> Result<LoadedImage, CropError> {
    load_inner(source, max_side, cancel).map_err(|e| {
        log::warn!("load failed: {}", e);
        e
    })
}

fn load_inner<S: ImageSource + ?Sized>(
    source: &S,
    max_side: u32,
    cancel: &CancelToken,
) -> Result<LoadedImage, CropError> {
    cancel.check()?;
    let metadata = source
        .metadata()
        .map_err(|e| CropError::LoadFailure(e.to_string()))?;
    if metadata.width == 0 || metadata.height == 0 {
        return Err(CropError::LoadFailure(format!(
            "image reports empty bounds {}x{}",
            metadata.width, metadata.height
        )));
    }

    cancel.check()?;
    let preview = source
        .load_preview(max_side)
        .map_err(|e| CropError::LoadFailure(e.to_string()))?;
    if preview.is_empty() {
        return Err(CropError::LoadFailure(
            "could not load image for cropping".to_string(),
        ));
    }

    cancel.check()?;
    log::debug!(
        "loaded {}x{} source ({:?}) as {}x{} preview",
        metadata.width,
        metadata.height,
        metadata.orientation,
        preview.width,
        preview.height
    );
    Ok(LoadedImage { preview, metadata })
}

/// Decode the cropped region at full resolution, draw it onto the output
/// canvas, and write the encoded result to `sink`.
pub fn commit_crop<S, W>(
    source: &S,
    result: &CropResult,
    config: &CropConfig,
    sink: W,
    cancel: &CancelToken,
) -> Result<CommitSummary, CropError>
where
    S: ImageSource + ?Sized,
    W: Write,
{
    commit_inner(source, result, config, sink, cancel).map_err(|e| {
        log::warn!("commit failed: {}", e);
        e
    })
}

fn commit_inner<S, W>(
    source: &S,
    result: &CropResult,
    config: &CropConfig,
    sink: W,
    cancel: &CancelToken,
) -> Result<CommitSummary, CropError>
where
    S: ImageSource + ?Sized,
    W: Write,
{
    let (out_w, out_h) = (config.output_width, config.output_height);
    cancel.check()?;

    let requested = result.true_crop.round_out();
    if requested.is_empty() {
        return Err(CropError::EmptyCrop);
    }

    let mut decoder = source.open_region_decoder()?;
    let (src_w, src_h) = decoder.dimensions();
    let region = requested.clamp_to(src_w, src_h);
    if region.is_empty() {
        return Err(CropError::EmptyCrop);
    }

    let sample = sample_size(region.width() as u32, region.height() as u32, out_w, out_h);
    log::debug!("decoding region {:?} at sample size {}", region, sample);

    cancel.check()?;
    let decoded = decoder.decode_region(region, sample)?;
    drop(decoder);

    cancel.check()?;
    let region_in_preview =
        scaled_crop_bounds(&region.to_rect(), &result.original_bounds, &result.raw_image_rect)?;
    let matrix = compositing_matrix(
        &Rect::from_size(decoded.width as f32, decoded.height as f32),
        &region_in_preview,
        &result.display_image_matrix,
        &result.display_crop_rect,
        &Rect::from_size(out_w as f32, out_h as f32),
    )?;
    let canvas = Compositor::new(out_w, out_h, config.background).composite(&decoded, &matrix)?;

    cancel.check()?;
    let policy = config.compress_policy();
    write_image(&canvas, &policy, sink)?;

    Ok(CommitSummary {
        width: out_w,
        height: out_h,
        format: policy.format,
        region,
        sample_size: sample,
    })
}
