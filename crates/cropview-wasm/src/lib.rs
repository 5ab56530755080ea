//! Cropview WASM - WebAssembly bindings for the cropview widget
//!
//! Exposes one crop session per [`JsCropSession`] to a JavaScript host. The
//! host draws the preview and the crop window; everything else (gesture
//! tracking, crop resolution, region decode and encoding) runs here.
//!
//! # Module Structure
//!
//! - `session` - the `JsCropSession` binding
//! - `types` - WASM-compatible wrappers for preview pixels and matrices
//! - `logger` - routes `log` output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession } from '@cropview/wasm';
//!
//! await init();
//!
//! const session = JsCropSession.from_config({ output_width: 800, output_height: 600 });
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! session.set_viewport(canvas.width, canvas.height);
//! ```

use wasm_bindgen::prelude::*;

mod logger;
mod session;
mod types;

pub use session::JsCropSession;
pub use types::JsPreviewImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Change how much of the engine's logging reaches the console.
///
/// Accepts "off", "error", "warn", "info", "debug" or "trace" (any case).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(filter) => {
            log::set_max_level(filter);
            true
        }
        None => false,
    }
}

fn parse_level(level: &str) -> Option<log::LevelFilter> {
    level.parse().ok()
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
