//! Pointer-driven crop workflow for a single viewed page.
//!
//! ```text
//! Idle -> Selecting -> SelectionReady -> Cropped -> Saved
//!   ^_________________ page change (from any state) ______|
//! ```
//!
//! Only one selection is active per viewed page. A failed crop leaves the
//! state untouched so the user can retry without re-selecting.

use tracing::{debug, warn};

use crate::error::CropError;
use crate::extract::{crop_page, CroppedImage, PixelSource};
use crate::geometry::{PageView, Point, Selection};
use crate::CropOptions;

/// Current state of the crop workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CropState {
    /// No selection.
    #[default]
    Idle,
    /// Pointer is down and dragging.
    Selecting { anchor: Point, current: Point },
    /// Drag finished with a usable selection.
    SelectionReady { selection: Selection },
    /// Selection extracted and encoded, not yet uploaded.
    Cropped {
        selection: Selection,
        image: CroppedImage,
    },
    /// Encoded bytes handed off for upload.
    Saved { selection: Selection },
}

impl CropState {
    /// Stable snake_case name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            CropState::Idle => "idle",
            CropState::Selecting { .. } => "selecting",
            CropState::SelectionReady { .. } => "selection_ready",
            CropState::Cropped { .. } => "cropped",
            CropState::Saved { .. } => "saved",
        }
    }
}

/// Selection and crop state machine for one viewed page.
#[derive(Debug, Clone, Default)]
pub struct CropWorkflow {
    state: CropState,
    options: CropOptions,
}

impl CropWorkflow {
    pub fn new(options: CropOptions) -> Self {
        Self {
            state: CropState::Idle,
            options,
        }
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    /// The in-progress or finalized selection, if any.
    pub fn selection(&self) -> Option<Selection> {
        match &self.state {
            CropState::Idle => None,
            CropState::Selecting { anchor, current } => Some(Selection::from_corners(*anchor, *current)),
            CropState::SelectionReady { selection }
            | CropState::Cropped { selection, .. }
            | CropState::Saved { selection } => Some(*selection),
        }
    }

    /// The cropped image awaiting save, if any.
    pub fn cropped(&self) -> Option<&CroppedImage> {
        match &self.state {
            CropState::Cropped { image, .. } => Some(image),
            _ => None,
        }
    }

    /// Whether the crop action should be enabled.
    pub fn can_crop(&self) -> bool {
        matches!(
            self.state,
            CropState::SelectionReady { .. } | CropState::Cropped { .. }
        )
    }

    /// Start a new selection, discarding any previous selection or uncommitted crop.
    pub fn pointer_down(&mut self, at: Point) {
        self.state = CropState::Selecting {
            anchor: at,
            current: at,
        };
    }

    /// Update the dragged corner. Returns false if no drag is active.
    pub fn pointer_move(&mut self, to: Point) -> bool {
        match &mut self.state {
            CropState::Selecting { current, .. } => {
                *current = to;
                true
            }
            _ => false,
        }
    }

    /// Finish the drag.
    ///
    /// Returns the selection if it met the size threshold; otherwise the
    /// workflow returns to idle.
    pub fn pointer_up(&mut self, at: Point) -> Option<Selection> {
        let CropState::Selecting { anchor, .. } = self.state else {
            return None;
        };

        let selection = Selection::from_corners(anchor, at);
        if self.options.accepts(&selection) {
            debug!(
                x = selection.x,
                y = selection.y,
                width = selection.width,
                height = selection.height,
                "Selection ready"
            );
            self.state = CropState::SelectionReady { selection };
            Some(selection)
        } else {
            self.state = CropState::Idle;
            None
        }
    }

    /// Crop the ready selection from the page rendered in `view`.
    ///
    /// `bitmap` must hold the surface's current pixels. Re-cropping from the
    /// `Cropped` state replaces the previous image.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::DegenerateSelection`] when there is no ready
    /// selection, or whatever [`crop_page`] reports. The state is unchanged on
    /// error.
    pub fn crop<V, P>(&mut self, view: &V, pixels: &P) -> Result<(), CropError>
    where
        V: PageView,
        P: PixelSource + ?Sized,
    {
        let selection = match &self.state {
            CropState::SelectionReady { selection } | CropState::Cropped { selection, .. } => {
                *selection
            }
            _ => return Err(CropError::DegenerateSelection),
        };

        let image = crop_page(view, pixels, &selection, &self.options).inspect_err(|e| {
            warn!(kind = e.kind(), error = %e, "Crop failed, keeping selection");
        })?;

        self.state = CropState::Cropped { selection, image };
        Ok(())
    }

    /// Hand the cropped image off for upload and move to `Saved`.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::NothingToSave`] unless the workflow is in `Cropped`.
    pub fn mark_saved(&mut self) -> Result<CroppedImage, CropError> {
        match std::mem::take(&mut self.state) {
            CropState::Cropped { selection, image } => {
                self.state = CropState::Saved { selection };
                Ok(image)
            }
            other => {
                self.state = other;
                Err(CropError::NothingToSave)
            }
        }
    }

    /// Drop any selection and crop because the viewed page changed.
    pub fn page_changed(&mut self) {
        if self.state != CropState::Idle {
            debug!(from = self.state.name(), "Page changed, discarding selection");
        }
        self.reset();
    }

    /// Return to `Idle`.
    pub fn reset(&mut self) {
        self.state = CropState::Idle;
    }
}
