//! Selection-to-source mapping.
//!
//! Converts a selection recorded in container-viewport pixels into a region of
//! the surface's native bitmap.
//!
//! # Algorithm
//!
//! ```text
//! surface_x = sel.x - offset.x + scroll.x
//! surface_y = sel.y - offset.y + scroll.y
//! native    = surface * scale
//! region    = native ∩ [0, native_width] x [0, native_height]
//! ```
//!
//! Edges are rounded to the nearest native pixel before clamping, so the
//! result is always contained in the bitmap.

use super::resolve::RenderGeometry;
use super::types::{CropRegion, Selection};

/// Map a selection to a crop region in native bitmap pixels.
///
/// This is a pure function of its inputs. A selection that lies entirely
/// outside the surface produces a region with zero width or zero height;
/// check [`CropRegion::is_empty`] before extracting.
pub fn map_selection(selection: &Selection, geometry: &RenderGeometry) -> CropRegion {
    let offset = geometry.surface_offset();
    let scroll = geometry.scroll();
    let scale = geometry.scale();

    let surface_x = selection.x - offset.x + scroll.x;
    let surface_y = selection.y - offset.y + scroll.y;

    let native_w = geometry.native_width();
    let native_h = geometry.native_height();

    let left = to_native_px(surface_x * scale, native_w);
    let top = to_native_px(surface_y * scale, native_h);
    let right = to_native_px((surface_x + selection.width) * scale, native_w);
    let bottom = to_native_px((surface_y + selection.height) * scale, native_h);

    CropRegion {
        x: left,
        y: top,
        width: right.saturating_sub(left),
        height: bottom.saturating_sub(top),
    }
}

/// Round an edge to a pixel boundary and clamp it to `[0, max]`.
#[inline]
fn to_native_px(value: f64, max: u32) -> u32 {
    // `as` saturates and maps NaN to 0
    (value.round().clamp(0.0, max as f64)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};

    /// Geometry for a surface at `offset` inside a container at the origin.
    fn geometry(
        offset: (f64, f64),
        scroll: (f64, f64),
        displayed_width: f64,
        native: (u32, u32),
    ) -> RenderGeometry {
        let displayed_height = native.1 as f64 * displayed_width / native.0 as f64;
        RenderGeometry::from_parts(
            Rect::new(offset.0, offset.1, displayed_width, displayed_height),
            Rect::new(0.0, 0.0, 1000.0, 800.0),
            Point::new(scroll.0, scroll.1),
            native.0,
            native.1,
        )
        .unwrap()
    }

    #[test]
    fn test_hidpi_scrolled_surface() {
        // CSS width 800, native 1600, scrolled down 50, surface at (10, 20)
        let geo = geometry((10.0, 20.0), (0.0, 50.0), 800.0, (1600, 2400));
        let sel = Selection::new(100.0, 100.0, 50.0, 40.0);

        let region = map_selection(&sel, &geo);
        assert_eq!(region, CropRegion::new(180, 260, 100, 80));
    }

    #[test]
    fn test_width_capped_at_right_edge() {
        let geo = geometry((0.0, 0.0), (0.0, 0.0), 1000.0, (1000, 1200));
        let sel = Selection::new(980.0, 10.0, 60.0, 30.0);

        let region = map_selection(&sel, &geo);
        assert_eq!(region, CropRegion::new(980, 10, 20, 30));
    }

    #[test]
    fn test_origin_above_left_clamps_to_zero() {
        let geo = geometry((40.0, 60.0), (0.0, 0.0), 500.0, (1000, 1000));
        let sel = Selection::new(10.0, 10.0, 100.0, 100.0);

        let region = map_selection(&sel, &geo);
        assert_eq!(region.x, 0);
        assert_eq!(region.y, 0);
        // Only the part over the surface survives: (10+100-40)*2, (10+100-60)*2
        assert_eq!(region.width, 140);
        assert_eq!(region.height, 100);
    }

    #[test]
    fn test_selection_left_of_surface_is_empty() {
        let geo = geometry((200.0, 0.0), (0.0, 0.0), 400.0, (800, 800));
        let sel = Selection::new(10.0, 10.0, 50.0, 50.0);

        let region = map_selection(&sel, &geo);
        assert!(region.is_empty());
        assert_eq!(region.width, 0);
    }

    #[test]
    fn test_selection_below_surface_is_empty() {
        let geo = geometry((0.0, 0.0), (0.0, 0.0), 400.0, (800, 800));
        let sel = Selection::new(10.0, 500.0, 50.0, 50.0);

        let region = map_selection(&sel, &geo);
        assert!(region.is_empty());
        assert_eq!(region.height, 0);
        assert!(region.fits_within(800, 800));
    }

    #[test]
    fn test_horizontal_scroll() {
        let geo = geometry((0.0, 0.0), (30.0, 0.0), 600.0, (600, 800));
        let sel = Selection::new(10.0, 10.0, 20.0, 20.0);

        let region = map_selection(&sel, &geo);
        assert_eq!(region, CropRegion::new(40, 10, 20, 20));
    }

    #[test]
    fn test_fractional_scale_rounds_edges() {
        // 1.5x density
        let geo = geometry((0.0, 0.0), (0.0, 0.0), 400.0, (600, 900));
        let sel = Selection::new(3.0, 3.0, 7.0, 7.0);

        let region = map_selection(&sel, &geo);
        // left = round(4.5) = 5, right = round(15.0) = 15
        assert_eq!(region.x, 5);
        assert_eq!(region.width, 10);
    }

    #[test]
    fn test_empty_selection_maps_to_empty_region() {
        let geo = geometry((0.0, 0.0), (0.0, 0.0), 400.0, (800, 800));
        let region = map_selection(&Selection::new(50.0, 50.0, 0.0, 0.0), &geo);
        assert!(region.is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
