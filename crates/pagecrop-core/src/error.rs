//! Error types for the crop workflow.

use thiserror::Error;

use crate::encode::EncodeError;

/// Errors that can occur while resolving, mapping or extracting a crop.
///
/// None of these are fatal to the hosting page. Each variant carries a short
/// actionable message through [`CropError::user_message`].
#[derive(Debug, Error)]
pub enum CropError {
    /// No renderable surface is available (document still loading or not laid out).
    #[error("Page geometry unavailable: {0}")]
    GeometryUnavailable(String),

    /// The selection maps to a zero-area region, or there is no selection.
    #[error("Selection does not cover any part of the page")]
    DegenerateSelection,

    /// Copying or encoding the pixels failed.
    #[error("Crop extraction failed: {0}")]
    ExtractionFailure(String),

    /// There is no cropped image waiting to be saved.
    #[error("No cropped image to save")]
    NothingToSave,
}

impl CropError {
    /// Stable snake_case tag for this error, used across the JS boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            CropError::GeometryUnavailable(_) => "geometry_unavailable",
            CropError::DegenerateSelection => "degenerate_selection",
            CropError::ExtractionFailure(_) => "extraction_failure",
            CropError::NothingToSave => "nothing_to_save",
        }
    }

    /// Whether retrying the same request can succeed without re-selecting.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CropError::ExtractionFailure(_))
    }

    /// Short message suitable for a transient notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            CropError::GeometryUnavailable(_) => "The page is still loading. Try again in a moment.",
            CropError::DegenerateSelection => "Select a region of the page to crop.",
            CropError::ExtractionFailure(_) => "Could not capture the selected region. Please try again.",
            CropError::NothingToSave => "Crop a region before saving.",
        }
    }
}

impl From<EncodeError> for CropError {
    fn from(err: EncodeError) -> Self {
        CropError::ExtractionFailure(err.to_string())
    }
}
