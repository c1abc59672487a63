//! WASM bindings for geometry resolution, selection mapping and crop extraction.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! import { crop_page_region } from '@pagecrop/wasm';
//!
//! // Selection recorded in container-relative pixels during the drag
//! const image = crop_page_region(viewerEl, sel.x, sel.y, sel.width, sel.height, { format: 'png' }, 'canvas.page');
//! previewImg.src = image.data_uri();
//! form.append('file', new Blob([image.bytes()], { type: image.mime_type }));
//! ```

use crate::dom::DomPageView;
use crate::types::{
    crop_error_to_js, options_from_js, JsCropRegion, JsCroppedImage, JsRenderGeometry, JsSelection,
};
use pagecrop_core::{
    map_selection as core_map, resolve_geometry, CropError, CropRegion, Selection, SourceBitmap,
};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// Snapshot the geometry of the page canvas inside `container`.
///
/// # Errors
///
/// Throws an `Error` with `kind = "geometry_unavailable"` while the page is
/// still rendering. Disable crop controls until it succeeds.
#[wasm_bindgen]
pub fn resolve_page_geometry(
    container: HtmlElement,
    selector: Option<String>,
) -> Result<JsRenderGeometry, JsValue> {
    let view = DomPageView::new(container, selector);
    resolve_geometry(&view)
        .map(JsRenderGeometry::from_core)
        .map_err(|e| crop_error_to_js(&e))
}

/// Map a container-relative selection to native bitmap pixels.
///
/// Check `is_empty()` on the result before cropping.
#[wasm_bindgen]
pub fn map_selection(
    geometry: &JsRenderGeometry,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> JsCropRegion {
    let selection = Selection::new(x, y, width, height);
    JsCropRegion::from_core(core_map(&selection, geometry.inner()))
}

/// Map a [`JsSelection`] to native bitmap pixels.
#[wasm_bindgen]
pub fn map_js_selection(geometry: &JsRenderGeometry, selection: &JsSelection) -> JsCropRegion {
    JsCropRegion::from_core(core_map(selection.inner(), geometry.inner()))
}

/// Crop a selection from the page canvas inside `container`.
///
/// Resolves fresh geometry, maps the selection, reads only the mapped canvas
/// pixels and encodes them.
///
/// # Arguments
///
/// * `container` - The scrollable element holding the page canvas
/// * `x`, `y`, `width`, `height` - Selection in container-relative pixels
/// * `options` - Optional `{ format: 'png' | 'jpeg', jpegQuality, minSelectionPx }`
/// * `selector` - Optional canvas selector, same as for [`resolve_page_geometry`]
#[wasm_bindgen]
pub fn crop_page_region(
    container: HtmlElement,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    options: JsValue,
    selector: Option<String>,
) -> Result<JsCroppedImage, JsValue> {
    let options = options_from_js(options)?;
    let view = DomPageView::new(container, selector);
    let selection = Selection::new(x, y, width, height);

    read_and_crop(&view, &selection, &options)
        .map(JsCroppedImage::from_core)
        .map_err(|e| crop_error_to_js(&e))
}

/// Crop a region from raw RGBA pixels (e.g. an `ImageData` the caller already holds).
///
/// The region is clamped to the bitmap; an empty result throws
/// `degenerate_selection`.
#[wasm_bindgen]
pub fn crop_rgba(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    region: &JsCropRegion,
    options: JsValue,
) -> Result<JsCroppedImage, JsValue> {
    let options = options_from_js(options)?;
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        let err = CropError::ExtractionFailure(format!(
            "expected {} bytes for {}x{}, got {}",
            expected,
            width,
            height,
            pixels.len()
        ));
        return Err(crop_error_to_js(&err));
    }

    let bitmap = SourceBitmap::new(width, height, pixels);
    pagecrop_core::extract_crop(&bitmap, clamp_region(region, width, height), &options)
        .map(JsCroppedImage::from_core)
        .map_err(|e| crop_error_to_js(&e))
}

/// Crop `selection` from the canvas currently inside `view`.
fn read_and_crop(
    view: &DomPageView,
    selection: &Selection,
    options: &pagecrop_core::CropOptions,
) -> Result<pagecrop_core::CroppedImage, CropError> {
    let surface = view.require_surface()?;
    pagecrop_core::crop_page(view, &surface, selection, options)
}

/// Intersect a JS-supplied region with a `width x height` bitmap.
fn clamp_region(region: &JsCropRegion, width: u32, height: u32) -> CropRegion {
    let x = region.x().min(width);
    let y = region.y().min(height);
    CropRegion::new(
        x,
        y,
        region.width().min(width - x),
        region.height().min(height - y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecrop_core::{Point, Rect, RenderGeometry};

    fn geometry() -> JsRenderGeometry {
        // CSS width 800, native 1600, surface at (10, 20), scrolled down 50
        let core = RenderGeometry::from_parts(
            Rect::new(10.0, 20.0, 800.0, 1000.0),
            Rect::new(0.0, 0.0, 1000.0, 700.0),
            Point::new(0.0, 50.0),
            1600,
            2000,
        )
        .unwrap();
        JsRenderGeometry::from_core(core)
    }

    #[test]
    fn test_map_selection_binding() {
        let region = map_selection(&geometry(), 100.0, 100.0, 50.0, 40.0);
        assert_eq!(
            (region.x(), region.y(), region.width(), region.height()),
            (180, 260, 100, 80)
        );
    }

    #[test]
    fn test_map_js_selection_matches() {
        let geo = geometry();
        let sel = JsSelection::new(100.0, 100.0, 50.0, 40.0);
        assert_eq!(
            map_js_selection(&geo, &sel),
            map_selection(&geo, 100.0, 100.0, 50.0, 40.0)
        );
    }

    #[test]
    fn test_map_selection_off_page() {
        let region = map_selection(&geometry(), 5000.0, 100.0, 50.0, 40.0);
        assert!(region.is_empty());
    }

    #[test]
    fn test_geometry_getters() {
        let geo = geometry();
        assert_eq!(geo.scale(), 2.0);
        assert_eq!(geo.offset_x(), 10.0);
        assert_eq!(geo.offset_y(), 20.0);
        assert_eq!(geo.scroll_y(), 50.0);
        assert_eq!(geo.native_height(), 2000);
    }

    #[test]
    fn test_clamp_region() {
        let region = JsCropRegion::from_core(CropRegion::new(90, 5, 50, 200));
        assert_eq!(clamp_region(&region, 100, 100), CropRegion::new(90, 5, 10, 95));

        let outside = JsCropRegion::from_core(CropRegion::new(150, 150, 10, 10));
        assert!(clamp_region(&outside, 100, 100).is_empty());
    }
}
