//! pagecrop WASM - WebAssembly bindings for pagecrop
//!
//! This crate exposes pagecrop-core to the web front-end, backed by the live
//! DOM: the scrollable viewer element and the `<canvas>` the PDF renderer
//! draws each page into.
//!
//! # Module Structure
//!
//! - `dom` - `PageView`/`RenderSurface` over DOM elements, canvas pixel reads
//! - `types` - WASM-compatible wrapper types, error and options conversion
//! - `crop` - Geometry, selection mapping and one-shot crop bindings
//! - `workflow` - Pointer-driven crop workflow class
//!
//! # Usage
//!
//! ```typescript
//! import init, { resolve_page_geometry, map_selection } from '@pagecrop/wasm';
//!
//! await init();
//!
//! const geometry = resolve_page_geometry(viewerEl);
//! const region = map_selection(geometry, sel.x, sel.y, sel.width, sel.height);
//! cropButton.disabled = region.is_empty();
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod dom;
mod types;
mod workflow;

// Re-export public types
pub use crop::{crop_page_region, crop_rgba, map_js_selection, map_selection, resolve_page_geometry};
pub use types::{JsCropRegion, JsCroppedImage, JsRenderGeometry, JsSelection};
pub use workflow::JsCropWorkflow;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
