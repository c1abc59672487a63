//! JPEG encoding for cropped regions.
//!
//! Canvas pixels carry an alpha channel that JPEG cannot store. Transparent
//! areas are composited onto white, matching how an unpainted page looks.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{validate_rgba, EncodeError, RGBA_CHANNELS};

/// Encode RGBA8 pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// Quality is clamped to 1..=100. For scanned worksheets, 85-95 keeps small
/// print legible.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgba(pixels, width, height)?;

    let quality = quality.clamp(1, 100);
    let rgb = flatten_onto_white(pixels);

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// Drop the alpha channel, blending each pixel over opaque white.
fn flatten_onto_white(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / RGBA_CHANNELS * 3);
    for px in rgba.chunks_exact(RGBA_CHANNELS) {
        let alpha = px[3] as u32;
        for &channel in &px[..3] {
            let blended = (channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_markers() {
        let pixels = vec![128u8; 32 * 32 * 4];
        let jpeg = encode_jpeg(&pixels, 32, 32, 90).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        let len = jpeg.len();
        assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 4];

        // Quality 0 should be clamped to 1
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());

        // Quality 255 should be clamped to 100
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_input() {
        assert!(matches!(
            encode_jpeg(&[], 0, 10, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));

        let pixels = vec![0u8; 10 * 10 * 3]; // RGB, not RGBA
        assert!(matches!(
            encode_jpeg(&pixels, 10, 10, 90),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_flatten_transparent_is_white() {
        let rgb = flatten_onto_white(&[0, 0, 0, 0]);
        assert_eq!(rgb, vec![255, 255, 255]);
    }

    #[test]
    fn test_flatten_opaque_unchanged() {
        let rgb = flatten_onto_white(&[10, 20, 30, 255, 200, 100, 0, 255]);
        assert_eq!(rgb, vec![10, 20, 30, 200, 100, 0]);
    }

    #[test]
    fn test_flatten_half_alpha() {
        // 0 over white at ~50% alpha lands near mid-gray
        let rgb = flatten_onto_white(&[0, 0, 0, 128]);
        assert!(rgb.iter().all(|&c| (126..=128).contains(&c)));
    }
}
