//! WASM bindings for the per-page crop workflow.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const flow = new JsCropWorkflow(viewerEl, { format: 'png' });
//!
//! // Container-relative coordinates; offsetX/offsetY would be relative to the canvas
//! const at = (e: PointerEvent): [number, number] => {
//!   const box = viewerEl.getBoundingClientRect();
//!   return [e.clientX - box.left, e.clientY - box.top];
//! };
//! viewerEl.onpointerdown = (e) => flow.pointer_down(...at(e));
//! viewerEl.onpointermove = (e) => flow.pointer_move(...at(e));
//! viewerEl.onpointerup = (e) => { cropButton.disabled = !flow.pointer_up(...at(e)); };
//!
//! cropButton.onclick = () => {
//!   try {
//!     preview.src = flow.crop().data_uri();
//!   } catch (err) {
//!     toast(err.message); // selection is kept, user can retry
//!   }
//! };
//! onPageChange(() => flow.page_changed());
//! ```

use crate::dom::DomPageView;
use crate::types::{crop_error_to_js, options_from_js, JsCroppedImage, JsSelection};
use pagecrop_core::{CropError, CropWorkflow, Point};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// Crop workflow bound to one page viewer container.
#[wasm_bindgen]
pub struct JsCropWorkflow {
    inner: CropWorkflow,
    view: DomPageView,
}

#[wasm_bindgen]
impl JsCropWorkflow {
    /// Create a workflow for the canvas inside `container`.
    ///
    /// # Arguments
    /// * `container` - Scrollable viewer element
    /// * `options` - Optional crop options object
    /// * `selector` - Optional canvas selector (defaults to the first `canvas`)
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        options: JsValue,
        selector: Option<String>,
    ) -> Result<JsCropWorkflow, JsValue> {
        let options = options_from_js(options)?;
        Ok(JsCropWorkflow {
            inner: CropWorkflow::new(options),
            view: DomPageView::new(container, selector),
        })
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.pointer_down(Point::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(Point::new(x, y))
    }

    /// Finish the drag; returns true if a usable selection is ready.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_up(Point::new(x, y)).is_some()
    }

    /// Crop the ready selection from the live canvas.
    ///
    /// Throws on failure and keeps the selection, so calling again retries.
    pub fn crop(&mut self) -> Result<JsCroppedImage, JsValue> {
        if !self.inner.can_crop() {
            return Err(crop_error_to_js(&CropError::DegenerateSelection));
        }

        let surface = self
            .view
            .require_surface()
            .map_err(|e| crop_error_to_js(&e))?;
        self.inner
            .crop(&self.view, &surface)
            .map_err(|e| crop_error_to_js(&e))?;

        self.inner
            .cropped()
            .cloned()
            .map(JsCroppedImage::from_core)
            .ok_or_else(|| crop_error_to_js(&CropError::NothingToSave))
    }

    /// Hand the cropped image off for upload; the workflow moves to `saved`.
    pub fn mark_saved(&mut self) -> Result<JsCroppedImage, JsValue> {
        self.inner
            .mark_saved()
            .map(JsCroppedImage::from_core)
            .map_err(|e| crop_error_to_js(&e))
    }

    /// Discard the selection and any uncommitted crop.
    pub fn page_changed(&mut self) {
        self.inner.page_changed();
    }

    /// Current state name: `idle`, `selecting`, `selection_ready`, `cropped` or `saved`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().name().to_string()
    }

    /// Whether the crop control should be enabled.
    pub fn can_crop(&self) -> bool {
        self.inner.can_crop()
    }

    /// The current selection for drawing the overlay, if any.
    pub fn selection(&self) -> Option<JsSelection> {
        self.inner.selection().map(JsSelection::from_core)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::HtmlCanvasElement;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_page(with_canvas: bool) -> HtmlElement {
        let document = web_sys::window().unwrap().document().unwrap();
        let container = document
            .create_element("div")
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        container
            .set_attribute("style", "position:absolute;left:0;top:0;width:300px;height:300px")
            .unwrap();

        if with_canvas {
            let canvas = document
                .create_element("canvas")
                .unwrap()
                .dyn_into::<HtmlCanvasElement>()
                .unwrap();
            canvas.set_width(200);
            canvas.set_height(200);
            canvas
                .set_attribute("style", "display:block;width:100px;height:100px")
                .unwrap();
            container.append_child(&canvas).unwrap();
        }
        document.body().unwrap().append_child(&container).unwrap();
        container
    }

    #[wasm_bindgen_test]
    fn test_drag_crop_save() {
        let mut flow = JsCropWorkflow::new(mount_page(true), JsValue::UNDEFINED, None).unwrap();
        flow.pointer_down(10.0, 10.0);
        flow.pointer_move(20.0, 20.0);
        assert!(flow.pointer_up(30.0, 20.0));
        assert_eq!(flow.state(), "selection_ready");

        let image = flow.crop().unwrap();
        assert_eq!((image.width(), image.height()), (40, 20));
        assert_eq!(flow.state(), "cropped");

        flow.mark_saved().unwrap();
        assert_eq!(flow.state(), "saved");

        flow.page_changed();
        assert_eq!(flow.state(), "idle");
        assert!(flow.selection().is_none());
    }

    #[wasm_bindgen_test]
    fn test_crop_while_loading_keeps_selection() {
        let mut flow = JsCropWorkflow::new(mount_page(false), JsValue::UNDEFINED, None).unwrap();
        flow.pointer_down(10.0, 10.0);
        assert!(flow.pointer_up(30.0, 20.0));

        assert!(flow.crop().is_err());
        assert_eq!(flow.state(), "selection_ready");
        assert!(flow.can_crop());
    }

    #[wasm_bindgen_test]
    fn test_selector_targets_named_canvas() {
        let container = mount_page(false);
        let mut flow = JsCropWorkflow::new(
            container.clone(),
            JsValue::UNDEFINED,
            Some("canvas.page".into()),
        )
        .unwrap();
        flow.pointer_down(10.0, 10.0);
        assert!(flow.pointer_up(30.0, 20.0));

        // A canvas without the class is not the page
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        canvas.set_width(200);
        canvas.set_height(200);
        canvas
            .set_attribute("style", "display:block;width:100px;height:100px")
            .unwrap();
        container.append_child(&canvas).unwrap();
        assert!(flow.crop().is_err());

        canvas.set_class_name("page");
        let image = flow.crop().unwrap();
        assert_eq!((image.width(), image.height()), (40, 20));
    }

    #[wasm_bindgen_test]
    fn test_crop_without_selection() {
        let mut flow = JsCropWorkflow::new(mount_page(true), JsValue::UNDEFINED, None).unwrap();
        assert!(flow.crop().is_err());
        assert_eq!(flow.state(), "idle");
    }
}
