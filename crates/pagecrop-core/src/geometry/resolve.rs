//! Geometry resolution for a rendered page inside a scrollable container.
//!
//! The rendering surface is usually drawn at a higher pixel density than its
//! CSS box, so the device scale factor is rarely 1. It is recomputed on every
//! call because scroll position and zoom change between selections.

use serde::Serialize;
use tracing::debug;

use super::types::{Point, Rect};
use crate::error::CropError;

/// A rendered page surface (for example a canvas produced by a PDF renderer).
pub trait RenderSurface {
    /// Displayed bounding box in viewport (CSS pixel) coordinates.
    fn bounding_rect(&self) -> Rect;

    /// Native bitmap dimensions `(width, height)` in device pixels.
    fn native_size(&self) -> (u32, u32);
}

/// A scrollable container that may hold a rendered page surface.
pub trait PageView {
    type Surface: RenderSurface;

    /// Origin of the container's scrolled content in viewport coordinates.
    ///
    /// This is the container's bounding box moved back by its scroll offsets,
    /// i.e. where its top-left would sit with both scroll offsets at zero. The
    /// surface offset is measured from here, so it stays the unscrolled layout
    /// offset however far the container is scrolled.
    fn container_rect(&self) -> Rect;

    /// Current scroll offsets (`scrollLeft`, `scrollTop`).
    fn scroll_offset(&self) -> Point;

    /// The rendered surface, or `None` while the document is still loading.
    fn surface(&self) -> Option<Self::Surface>;
}

/// Snapshot of where a rendered surface sits and how it is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderGeometry {
    surface_rect: Rect,
    surface_offset: Point,
    scroll: Point,
    native_width: u32,
    native_height: u32,
    scale: f64,
}

impl RenderGeometry {
    /// Build a geometry snapshot from raw measurements.
    ///
    /// `surface_rect` is the live bounding box of the surface and
    /// `container_rect` the content origin described on
    /// [`PageView::container_rect`]. Their difference is the layout offset of
    /// the surface inside the container's content; `scroll` is added back
    /// separately when mapping selections.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::GeometryUnavailable`] if the surface has no
    /// displayed width or no native pixels yet.
    pub fn from_parts(
        surface_rect: Rect,
        container_rect: Rect,
        scroll: Point,
        native_width: u32,
        native_height: u32,
    ) -> Result<Self, CropError> {
        if native_width == 0 || native_height == 0 {
            return Err(CropError::GeometryUnavailable(format!(
                "surface has no pixels ({}x{})",
                native_width, native_height
            )));
        }
        if !surface_rect.width.is_finite() || surface_rect.width <= 0.0 {
            return Err(CropError::GeometryUnavailable(format!(
                "surface has no displayed width ({})",
                surface_rect.width
            )));
        }

        let scale = native_width as f64 / surface_rect.width;

        Ok(Self {
            surface_rect,
            surface_offset: surface_rect.offset_from(&container_rect),
            scroll,
            native_width,
            native_height,
            scale,
        })
    }

    /// Surface bounding box in viewport coordinates.
    pub fn surface_rect(&self) -> Rect {
        self.surface_rect
    }

    /// Surface offset inside the container's content, independent of scroll.
    pub fn surface_offset(&self) -> Point {
        self.surface_offset
    }

    /// Container scroll offsets at the time of the snapshot.
    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn native_width(&self) -> u32 {
        self.native_width
    }

    pub fn native_height(&self) -> u32 {
        self.native_height
    }

    /// Device scale factor: native pixel width / displayed CSS width.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Resolve the current geometry of the page rendered inside `view`.
///
/// # Errors
///
/// Returns [`CropError::GeometryUnavailable`] when the container holds no
/// surface or the surface has not been laid out. Callers should treat this
/// as "crop unavailable".
pub fn resolve_geometry<V: PageView>(view: &V) -> Result<RenderGeometry, CropError> {
    let surface = view
        .surface()
        .ok_or_else(|| CropError::GeometryUnavailable("no rendered surface in container".into()))?;

    let (native_width, native_height) = surface.native_size();
    let geometry = RenderGeometry::from_parts(
        surface.bounding_rect(),
        view.container_rect(),
        view.scroll_offset(),
        native_width,
        native_height,
    )?;

    debug!(
        offset_x = geometry.surface_offset.x,
        offset_y = geometry.surface_offset.y,
        scroll_x = geometry.scroll.x,
        scroll_y = geometry.scroll.y,
        native = format!("{}x{}", native_width, native_height),
        scale = geometry.scale,
        "Resolved page geometry"
    );

    Ok(geometry)
}
