//! Pixel extraction for mapped crop regions.
//!
//! The extractor copies the selected window of the source bitmap 1:1 into a
//! freshly allocated buffer (no resampling) and encodes the result. Each crop
//! owns its buffer; nothing is shared between requests.

mod bitmap;
mod crop;

pub use bitmap::{PixelSource, SourceBitmap};
pub use crop::{crop_page, crop_pixels, extract_crop, CroppedImage};
