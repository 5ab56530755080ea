//! One crop widget, driven from JavaScript.
//!
//! The host owns the canvas and the pointer listeners. It forwards pointer
//! events here, redraws the preview with [`JsCropSession::display_matrix`]
//! whenever a call returns `true`, and draws the crop window returned by
//! [`JsCropSession::crop_window`] on top.
//!
//! # Example
//!
//! ```typescript
//! import { JsCropSession } from '@cropview/wasm';
//!
//! const session = new JsCropSession(512, 512);
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! session.set_viewport(canvas.width, canvas.height);
//!
//! canvas.onpointerdown = (e) => session.touch_down(e.offsetX, e.offsetY) && redraw();
//! // ...
//! const jpeg = session.commit();
//! ```

use crate::types::{canvas_transform, JsPreviewImage};
use cropview_core::decode::{DecodedImage, EncodedImage};
use cropview_core::{
    commit_crop, load_image, CancelToken, CropConfig, CropError, CropSession, Point, TouchEvent,
};
use wasm_bindgen::prelude::*;

fn to_js_error(e: CropError) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// Crop session exposed to JavaScript.
#[wasm_bindgen]
pub struct JsCropSession {
    session: CropSession,
    source: Option<EncodedImage>,
    preview: Option<DecodedImage>,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Session producing a `width` x `height` output with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<JsCropSession, JsValue> {
        Self::with_config(CropConfig::with_output(width, height)).map_err(to_js_error)
    }

    /// Session from a plain JS object with any subset of the config fields,
    /// e.g. `{ output_width: 800, output_height: 600, output_format: "png" }`.
    pub fn from_config(config: JsValue) -> Result<JsCropSession, JsValue> {
        let config: CropConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))?;
        Self::with_config(config).map_err(to_js_error)
    }

    /// Decode `bytes` and show them. Any previous image and gesture is
    /// dropped, even if loading fails.
    pub fn load(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.load_bytes(bytes).map_err(to_js_error)
    }

    /// The preview to draw, if an image is loaded.
    pub fn preview(&self) -> Option<JsPreviewImage> {
        self.preview.as_ref().map(JsPreviewImage::from_decoded)
    }

    /// Report the canvas size. Returns true when the display was rebuilt.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        self.session.set_viewport(width, height)
    }

    #[wasm_bindgen(getter)]
    pub fn ready(&self) -> bool {
        self.session.is_ready()
    }

    pub fn touch_down(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_touch(TouchEvent::Down(Point::new(x, y)))
    }

    /// A second finger went down at `(x1, y1)` while the first is at `(x0, y0)`.
    /// Ignored unless `touch_down` started a gesture.
    pub fn pointer_down(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> bool {
        self.session.handle_touch(TouchEvent::PointerDown {
            first: Point::new(x0, y0),
            second: Point::new(x1, y1),
        })
    }

    pub fn touch_move(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_touch(TouchEvent::Move {
            first: Point::new(x, y),
            second: None,
        })
    }

    pub fn pinch_move(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> bool {
        self.session.handle_touch(TouchEvent::Move {
            first: Point::new(x0, y0),
            second: Some(Point::new(x1, y1)),
        })
    }

    pub fn pointer_up(&mut self) -> bool {
        self.session.handle_touch(TouchEvent::PointerUp)
    }

    pub fn touch_up(&mut self) -> bool {
        self.session.handle_touch(TouchEvent::Up)
    }

    pub fn cancel(&mut self) -> bool {
        self.session.handle_touch(TouchEvent::Cancel)
    }

    /// `[a, b, c, d, e, f]` for `setTransform`, or empty when not ready.
    pub fn display_matrix(&self) -> Vec<f32> {
        self.session
            .display_image_matrix()
            .map(|m| canvas_transform(&m))
            .unwrap_or_default()
    }

    /// `[left, top, right, bottom]` of the crop window, or empty when not ready.
    pub fn crop_window(&self) -> Vec<f32> {
        self.session
            .crop_in_screen()
            .map(|r| vec![r.left, r.top, r.right, r.bottom])
            .unwrap_or_default()
    }

    /// MIME type of what [`JsCropSession::commit`] produces.
    pub fn output_mime_type(&self) -> String {
        self.session
            .config()
            .compress_policy()
            .format
            .mime_type()
            .to_string()
    }

    /// Crop the full-resolution image and return the encoded bytes.
    pub fn commit(&self) -> Result<Vec<u8>, JsValue> {
        self.commit_bytes().map_err(to_js_error)
    }
}

impl JsCropSession {
    fn with_config(config: CropConfig) -> Result<Self, CropError> {
        Ok(Self {
            session: CropSession::new(config)?,
            source: None,
            preview: None,
        })
    }

    fn load_bytes(&mut self, bytes: Vec<u8>) -> Result<(), CropError> {
        self.source = None;
        self.preview = None;

        let source = EncodedImage::new(bytes);
        let max_side = self.session.config().preview_max_side;
        let loaded = match load_image(&source, max_side, &CancelToken::new()) {
            Ok(loaded) => loaded,
            Err(e) => {
                self.session.unload();
                return Err(e);
            }
        };
        self.session.show(&loaded)?;
        self.preview = Some(loaded.preview);
        self.source = Some(source);
        Ok(())
    }

    fn commit_bytes(&self) -> Result<Vec<u8>, CropError> {
        let source = self.source.as_ref().ok_or(CropError::NotReady)?;
        let result = self.session.crop_result()?;
        let mut out = Vec::new();
        let summary = commit_crop(
            source,
            &result,
            self.session.config(),
            &mut out,
            &CancelToken::new(),
        )?;
        log::info!(
            "committed {}x{} {:?} from region {:?}",
            summary.width,
            summary.height,
            summary.format,
            summary.region
        );
        Ok(out)
    }
}
