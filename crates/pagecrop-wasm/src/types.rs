//! WASM-compatible wrapper types for crop data.
//!
//! This module provides JavaScript-friendly types that wrap the core pagecrop
//! types, plus the error and options conversions used by every binding.

use pagecrop_core::{CropError, CropOptions, CropRegion, CroppedImage, RenderGeometry, Selection};
use wasm_bindgen::prelude::*;

/// A crop region in native bitmap pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsCropRegion {
    inner: CropRegion,
}

#[wasm_bindgen]
impl JsCropRegion {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u32 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u32 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// True if the region has no area; the crop action should stay disabled.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl JsCropRegion {
    pub(crate) fn from_core(inner: CropRegion) -> Self {
        Self { inner }
    }
}

/// A selection rectangle in container-relative screen pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsSelection {
    inner: Selection,
}

#[wasm_bindgen]
impl JsSelection {
    /// Create a selection; negative extents are normalized.
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> JsSelection {
        JsSelection {
            inner: Selection::new(x, y, width, height),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.height
    }
}

impl JsSelection {
    pub(crate) fn from_core(inner: Selection) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &Selection {
        &self.inner
    }
}

/// Snapshot of a rendered page's position and device scale factor.
///
/// Resolve a fresh one for every crop; scroll and zoom change between
/// selections.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsRenderGeometry {
    inner: RenderGeometry,
}

#[wasm_bindgen]
impl JsRenderGeometry {
    /// Device scale factor (native width / displayed width).
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale()
    }

    #[wasm_bindgen(getter)]
    pub fn native_width(&self) -> u32 {
        self.inner.native_width()
    }

    #[wasm_bindgen(getter)]
    pub fn native_height(&self) -> u32 {
        self.inner.native_height()
    }

    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> f64 {
        self.inner.surface_offset().x
    }

    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> f64 {
        self.inner.surface_offset().y
    }

    #[wasm_bindgen(getter)]
    pub fn scroll_x(&self) -> f64 {
        self.inner.scroll().x
    }

    #[wasm_bindgen(getter)]
    pub fn scroll_y(&self) -> f64 {
        self.inner.scroll().y
    }

    /// Serialize to a plain object for debugging overlays
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsRenderGeometry {
    pub(crate) fn from_core(inner: RenderGeometry) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &RenderGeometry {
        &self.inner
    }
}

/// An encoded crop for preview or upload.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory. `bytes()` and `data_uri()` copy
/// them out to JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsCroppedImage {
    inner: CroppedImage,
}

#[wasm_bindgen]
impl JsCroppedImage {
    /// Width in native pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Height in native pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// MIME type of the encoded bytes (e.g. `image/png`)
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.as_bytes().len()
    }

    /// Encoded bytes as a Uint8Array, e.g. for a multipart upload.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.as_bytes().to_vec()
    }

    /// `data:` URI for an `<img src>` preview.
    pub fn data_uri(&self) -> String {
        self.inner.to_data_uri()
    }
}

impl JsCroppedImage {
    pub(crate) fn from_core(inner: CroppedImage) -> Self {
        Self { inner }
    }
}

/// Convert a crop error into a JS `Error`.
///
/// The message is the short user-facing text; `kind` carries the error tag
/// and `detail` the full diagnostic. The detail is also logged to the console.
pub(crate) fn crop_error_to_js(err: &CropError) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&format!("pagecrop: {}", err)));

    let js_err = js_sys::Error::new(err.user_message());
    // Reflect::set only fails on frozen objects; a fresh Error is not frozen
    let _ = js_sys::Reflect::set(&js_err, &JsValue::from_str("kind"), &JsValue::from_str(err.kind()));
    let _ = js_sys::Reflect::set(
        &js_err,
        &JsValue::from_str("retryable"),
        &JsValue::from_bool(err.is_retryable()),
    );
    let _ = js_sys::Reflect::set(
        &js_err,
        &JsValue::from_str("detail"),
        &JsValue::from_str(&err.to_string()),
    );
    js_err.into()
}

/// Read crop options from a plain JS object; `undefined`/`null` mean defaults.
pub(crate) fn options_from_js(value: JsValue) -> Result<CropOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CropOptions::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop options: {}", e)))
}
