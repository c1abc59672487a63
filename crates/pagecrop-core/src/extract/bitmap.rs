//! Source bitmap type.

use crate::encode::RGBA_CHANNELS;
use crate::error::CropError;
use crate::geometry::CropRegion;

/// Something a crop region can be read from.
///
/// Lets a caller read only the mapped window of a large surface instead of
/// copying its whole backing store first.
pub trait PixelSource {
    /// Native dimensions `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Read the pixels inside `region` into a bitmap of the region's size.
    ///
    /// # Errors
    ///
    /// - [`CropError::DegenerateSelection`] if the region has zero area
    /// - [`CropError::ExtractionFailure`] if the region exceeds the source or
    ///   the pixels can't be read
    fn read_region(&self, region: CropRegion) -> Result<SourceBitmap, CropError>;
}

/// A rendered surface's pixels at native resolution.
///
/// Layout matches canvas `ImageData`: RGBA8, row-major, no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data. Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl SourceBitmap {
    /// Create a new SourceBitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * RGBA_CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a SourceBitmap from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage, or `None` if the buffer is malformed.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * RGBA_CHANNELS
    }

    /// True if the buffer length matches the dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.pixels.len() == self.stride() * self.height as usize
    }

    /// Check if this is an empty bitmap.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
