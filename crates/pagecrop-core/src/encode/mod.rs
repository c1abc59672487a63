//! Image encoding for cropped regions.
//!
//! This module provides functionality for:
//! - Encoding RGBA pixels to PNG (lossless, the default crop output)
//! - Encoding RGBA pixels to JPEG with configurable quality (smaller uploads)
//! - Wrapping encoded bytes in a `data:` URI for preview rendering
//!
//! All operations are synchronous and single-threaded.

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Bytes per RGBA8 pixel.
pub(crate) const RGBA_CHANNELS: usize = 4;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Check that `pixels` holds exactly `width * height` RGBA8 pixels.
pub(crate) fn validate_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * RGBA_CHANNELS;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}

/// Build a `data:<mime>;base64,...` URI from encoded bytes.
pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_prefix() {
        let uri = to_data_uri("image/png", &[0x89, b'P', b'N', b'G']);
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_data_uri_empty() {
        assert_eq!(to_data_uri("image/png", &[]), "data:image/png;base64,");
    }

    #[test]
    fn test_validate_rgba() {
        assert!(validate_rgba(&[0u8; 16], 2, 2).is_ok());
        assert!(matches!(
            validate_rgba(&[0u8; 12], 2, 2),
            Err(EncodeError::InvalidPixelData {
                expected: 16,
                actual: 12
            })
        ));
        assert!(matches!(
            validate_rgba(&[], 0, 2),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
