//! pagecrop Core - Region capture for rendered document pages
//!
//! This crate maps a user's drag selection over a rendered page (for example
//! a PDF page drawn to a canvas) to pixel-accurate coordinates in the page's
//! native bitmap, extracts those pixels 1:1 and encodes them for preview or
//! upload.
//!
//! # Pipeline
//!
//! 1. [`geometry::resolve_geometry`] snapshots where the surface sits and its
//!    device scale factor
//! 2. [`geometry::map_selection`] converts the selection to a [`CropRegion`]
//! 3. [`extract::extract_crop`] copies the region and encodes it
//!
//! [`workflow::CropWorkflow`] drives the pointer-driven selection state
//! machine on top of these steps.

pub mod encode;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod workflow;

pub use error::CropError;
pub use extract::{
    crop_page, crop_pixels, extract_crop, CroppedImage, PixelSource, SourceBitmap,
};
pub use geometry::{
    map_selection, resolve_geometry, CropRegion, PageView, Point, Rect, RenderGeometry,
    RenderSurface, Selection,
};
pub use workflow::{CropState, CropWorkflow};

use serde::{Deserialize, Serialize};

/// Encoded output format for cropped regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG (default).
    #[default]
    Png,
    /// JPEG, alpha flattened onto white.
    Jpeg,
}

impl OutputFormat {
    /// MIME type of the encoded output.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Options controlling how selections are accepted and crops are encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropOptions {
    /// Output encoding
    pub format: OutputFormat,
    /// JPEG quality (1 to 100), ignored for PNG
    pub jpeg_quality: u8,
    /// Minimum drag extent in screen pixels, on both axes, for a selection to count
    pub min_selection_px: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            jpeg_quality: 90,
            min_selection_px: 1.0,
        }
    }
}

impl CropOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a finished drag is large enough to become a selection.
    ///
    /// Zero-extent drags never qualify, even with a threshold of 0.
    pub fn accepts(&self, selection: &Selection) -> bool {
        !selection.is_empty()
            && selection.width >= self.min_selection_px
            && selection.height >= self.min_selection_px
    }

    /// Encode RGBA8 pixels in the configured format.
    pub fn encode(&self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, encode::EncodeError> {
        match self.format {
            OutputFormat::Png => encode::encode_png(pixels, width, height),
            OutputFormat::Jpeg => encode::encode_jpeg(pixels, width, height, self.jpeg_quality),
        }
    }
}
