//! Crop extraction and encoding.

use tracing::{debug, warn};

use super::bitmap::{PixelSource, SourceBitmap};
use crate::encode::{to_data_uri, RGBA_CHANNELS};
use crate::error::CropError;
use crate::geometry::{map_selection, resolve_geometry, CropRegion, PageView, Selection};
use crate::{CropOptions, OutputFormat};

/// An encoded crop, ready for preview or upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    width: u32,
    height: u32,
    format: OutputFormat,
    bytes: Vec<u8>,
}

impl CroppedImage {
    /// Width of the cropped region in native pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the cropped region in native pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Encoded bytes (for upload).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// `data:` URI (for preview rendering).
    pub fn to_data_uri(&self) -> String {
        to_data_uri(self.mime_type(), &self.bytes)
    }
}

/// Copy the pixels inside `region` into a new bitmap, 1:1.
///
/// # Errors
///
/// - [`CropError::DegenerateSelection`] if the region has zero area
/// - [`CropError::ExtractionFailure`] if the region exceeds the bitmap or the
///   bitmap buffer doesn't match its dimensions
pub fn crop_pixels(source: &SourceBitmap, region: CropRegion) -> Result<SourceBitmap, CropError> {
    if region.is_empty() {
        return Err(CropError::DegenerateSelection);
    }
    if !source.is_well_formed() {
        return Err(CropError::ExtractionFailure(format!(
            "source buffer holds {} bytes, expected {} for {}x{}",
            source.pixels.len(),
            source.stride() * source.height as usize,
            source.width,
            source.height
        )));
    }
    if !region.fits_within(source.width, source.height) {
        return Err(CropError::ExtractionFailure(format!(
            "region {}x{} at ({}, {}) exceeds {}x{} bitmap",
            region.width, region.height, region.x, region.y, source.width, source.height
        )));
    }

    let src_stride = source.stride();
    let row_bytes = region.width as usize * RGBA_CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy pixel data row by row
    for y in 0..region.height as usize {
        let start = (region.y as usize + y) * src_stride + region.x as usize * RGBA_CHANNELS;
        output.extend_from_slice(&source.pixels[start..start + row_bytes]);
    }

    Ok(SourceBitmap {
        width: region.width,
        height: region.height,
        pixels: output,
    })
}

impl PixelSource for SourceBitmap {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_region(&self, region: CropRegion) -> Result<SourceBitmap, CropError> {
        crop_pixels(self, region)
    }
}

/// Extract `region` from `source` and encode it per `options`.
///
/// On failure nothing is retained; callers keep their selection and may retry.
pub fn extract_crop(
    source: &SourceBitmap,
    region: CropRegion,
    options: &CropOptions,
) -> Result<CroppedImage, CropError> {
    let cropped = crop_pixels(source, region)?;
    let image = encode_window(cropped, options)?;

    debug!(
        x = region.x,
        y = region.y,
        width = region.width,
        height = region.height,
        format = options.format.mime_type(),
        encoded_bytes = image.bytes.len(),
        "Extracted crop"
    );

    Ok(image)
}

/// Encode an already extracted window.
fn encode_window(window: SourceBitmap, options: &CropOptions) -> Result<CroppedImage, CropError> {
    let bytes = options
        .encode(&window.pixels, window.width, window.height)
        .map_err(|e| {
            warn!(error = %e, "Failed to encode cropped region");
            CropError::from(e)
        })?;

    Ok(CroppedImage {
        width: window.width,
        height: window.height,
        format: options.format,
        bytes,
    })
}

/// Resolve geometry, map `selection` and extract the crop in one step.
///
/// `pixels` must be the current pixels of the surface inside `view`. Only the
/// mapped region is read from it.
pub fn crop_page<V, P>(
    view: &V,
    pixels: &P,
    selection: &Selection,
    options: &CropOptions,
) -> Result<CroppedImage, CropError>
where
    V: PageView,
    P: PixelSource + ?Sized,
{
    let geometry = resolve_geometry(view)?;
    let (width, height) = pixels.dimensions();
    if (geometry.native_width(), geometry.native_height()) != (width, height) {
        return Err(CropError::ExtractionFailure(format!(
            "bitmap is {}x{} but surface reports {}x{}",
            width,
            height,
            geometry.native_width(),
            geometry.native_height()
        )));
    }

    let region = map_selection(selection, &geometry);
    debug!(
        sel_x = selection.x,
        sel_y = selection.y,
        sel_width = selection.width,
        sel_height = selection.height,
        region = format!("{}x{}+{}+{}", region.width, region.height, region.x, region.y),
        "Mapped selection to native pixels"
    );
    if region.is_empty() {
        return Err(CropError::DegenerateSelection);
    }

    let window = pixels.read_region(region)?;
    if (window.width, window.height) != (region.width, region.height) || !window.is_well_formed() {
        return Err(CropError::ExtractionFailure(format!(
            "read {}x{} ({} bytes) for a {}x{} region",
            window.width,
            window.height,
            window.pixels.len(),
            region.width,
            region.height
        )));
    }

    let image = encode_window(window, options)?;
    debug!(
        format = options.format.mime_type(),
        encoded_bytes = image.bytes.len(),
        "Extracted crop"
    );
    Ok(image)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_bitmap(width: u32, height: u32) -> SourceBitmap {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, v.wrapping_mul(3), v.wrapping_add(7), 255]
            })
            .collect();
        SourceBitmap::new(width, height, pixels)
    }

    /// Strategy for a bitmap size and a region inside it.
    fn bitmap_and_region() -> impl Strategy<Value = (u32, u32, CropRegion)> {
        (1u32..=60, 1u32..=60).prop_flat_map(|(w, h)| {
            (0..w, 0..h).prop_flat_map(move |(x, y)| {
                (1..=w - x, 1..=h - y)
                    .prop_map(move |(cw, ch)| (w, h, CropRegion::new(x, y, cw, ch)))
            })
        })
    }

    proptest! {
        /// Property: Full-size extraction is pixel-identical to the source.
        #[test]
        fn prop_full_region_round_trip(width in 1u32..=60, height in 1u32..=60) {
            let bmp = create_test_bitmap(width, height);
            let out = crop_pixels(&bmp, CropRegion::full(width, height)).unwrap();
            prop_assert_eq!(out, bmp);
        }

        /// Property: A full-region PNG decodes back to the source pixels.
        #[test]
        fn prop_full_region_png_round_trip(width in 1u32..=24, height in 1u32..=24) {
            let bmp = create_test_bitmap(width, height);
            let cropped = extract_crop(&bmp, CropRegion::full(width, height), &CropOptions::new()).unwrap();
            let decoded = image::load_from_memory(cropped.as_bytes()).unwrap().to_rgba8();
            prop_assert_eq!(decoded.into_raw(), bmp.pixels);
        }

        /// Property: Output dimensions equal the region, with a matching buffer.
        #[test]
        fn prop_output_matches_region((w, h, region) in bitmap_and_region()) {
            let bmp = create_test_bitmap(w, h);
            let out = crop_pixels(&bmp, region).unwrap();

            prop_assert_eq!(out.width, region.width);
            prop_assert_eq!(out.height, region.height);
            prop_assert!(out.is_well_formed());
        }

        /// Property: The first copied pixel comes from the region origin.
        #[test]
        fn prop_origin_pixel_preserved((w, h, region) in bitmap_and_region()) {
            let bmp = create_test_bitmap(w, h);
            let out = crop_pixels(&bmp, region).unwrap();

            let src = (region.y as usize * w as usize + region.x as usize) * 4;
            prop_assert_eq!(&out.pixels[0..4], &bmp.pixels[src..src + 4]);
        }

        /// Property: Regions past the edge fail instead of panicking.
        #[test]
        fn prop_overflow_region_rejected(
            (w, h, region) in bitmap_and_region(),
            extra in 1u32..=20,
        ) {
            let bmp = create_test_bitmap(w, h);
            let too_wide = CropRegion::new(region.x, region.y, w - region.x + extra, region.height);
            let result = crop_pixels(&bmp, too_wide);
            prop_assert!(matches!(result, Err(CropError::ExtractionFailure(_))));
        }
    }
}
