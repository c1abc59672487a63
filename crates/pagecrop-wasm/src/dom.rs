//! DOM-backed page view.
//!
//! Implements the core [`PageView`] and [`RenderSurface`] traits over a
//! scrollable container element and the `<canvas>` a PDF renderer draws into.
//! Measurements are taken live from the DOM on every call.

use pagecrop_core::{
    CropError, CropRegion, PageView, PixelSource, Point, Rect, RenderSurface, SourceBitmap,
};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, DomRect, HtmlCanvasElement, HtmlElement};

/// Selector used to find the rendered page inside the container.
pub(crate) const DEFAULT_SURFACE_SELECTOR: &str = "canvas";

fn dom_rect(rect: &DomRect) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Move a live bounding rect back by the element's scroll offsets.
fn content_origin(rect: Rect, scroll: Point) -> Rect {
    Rect::new(rect.x - scroll.x, rect.y - scroll.y, rect.width, rect.height)
}

/// A rendered page canvas.
#[derive(Debug, Clone)]
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    fn context(&self) -> Result<CanvasRenderingContext2d, CropError> {
        self.canvas
            .get_context("2d")
            .map_err(|e| CropError::ExtractionFailure(format!("getContext failed: {:?}", e)))?
            .ok_or_else(|| CropError::ExtractionFailure("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CropError::ExtractionFailure("context is not a 2d context".into()))
    }
}

impl RenderSurface for CanvasSurface {
    fn bounding_rect(&self) -> Rect {
        dom_rect(&self.canvas.get_bounding_client_rect())
    }

    fn native_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}

impl PixelSource for CanvasSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.native_size()
    }

    /// Read one window of the backing bitmap through `getImageData`.
    ///
    /// Fails with [`CropError::ExtractionFailure`] if no 2D context is
    /// available (e.g. the canvas was claimed by WebGL) or the pixels can't be
    /// read (e.g. a tainted canvas).
    fn read_region(&self, region: CropRegion) -> Result<SourceBitmap, CropError> {
        if region.is_empty() {
            return Err(CropError::DegenerateSelection);
        }
        let (width, height) = self.native_size();
        if !region.fits_within(width, height) {
            return Err(CropError::ExtractionFailure(format!(
                "region {}x{} at ({}, {}) exceeds {}x{} canvas",
                region.width, region.height, region.x, region.y, width, height
            )));
        }

        let image_data = self
            .context()?
            .get_image_data(
                region.x as f64,
                region.y as f64,
                region.width as f64,
                region.height as f64,
            )
            .map_err(|e| CropError::ExtractionFailure(format!("getImageData failed: {:?}", e)))?;

        let Clamped(pixels) = image_data.data();
        if pixels.len() != region.area() as usize * 4 {
            return Err(CropError::ExtractionFailure(format!(
                "canvas returned {} bytes for {}x{}",
                pixels.len(),
                region.width,
                region.height
            )));
        }

        Ok(SourceBitmap::new(region.width, region.height, pixels))
    }
}

/// A scrollable container holding a rendered page canvas.
#[derive(Debug, Clone)]
pub(crate) struct DomPageView {
    container: HtmlElement,
    selector: String,
}

impl DomPageView {
    pub(crate) fn new(container: HtmlElement, selector: Option<String>) -> Self {
        Self {
            container,
            selector: selector.unwrap_or_else(|| DEFAULT_SURFACE_SELECTOR.to_string()),
        }
    }

    /// The page canvas, or a retryable error while it is still rendering.
    pub(crate) fn require_surface(&self) -> Result<CanvasSurface, CropError> {
        self.surface()
            .ok_or_else(|| CropError::GeometryUnavailable("no rendered canvas in container".into()))
    }

    // web-sys exposes scrollLeft/scrollTop as i32; the DOM value is fractional
    fn scroll_property(&self, name: &str) -> f64 {
        js_sys::Reflect::get(&self.container, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    }
}

impl PageView for DomPageView {
    type Surface = CanvasSurface;

    fn container_rect(&self) -> Rect {
        content_origin(
            dom_rect(&self.container.get_bounding_client_rect()),
            self.scroll_offset(),
        )
    }

    fn scroll_offset(&self) -> Point {
        Point::new(
            self.scroll_property("scrollLeft"),
            self.scroll_property("scrollTop"),
        )
    }

    fn surface(&self) -> Option<CanvasSurface> {
        // An invalid selector is treated the same as a missing canvas
        let element = self.container.query_selector(&self.selector).ok().flatten()?;
        let canvas = element.dyn_into::<HtmlCanvasElement>().ok()?;
        Some(CanvasSurface { canvas })
    }
}
