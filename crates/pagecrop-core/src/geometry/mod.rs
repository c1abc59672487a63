//! Screen-to-bitmap geometry for rendered document pages.
//!
//! # Coordinate Systems
//!
//! - **Container space**: CSS pixels relative to the top-left of the
//!   scrollable container's visible area. Selections live here.
//! - **Content space**: container space plus the scroll offsets. The
//!   surface's layout offset lives here and does not move when scrolling.
//! - **Surface space**: CSS pixels relative to the top-left of the rendered
//!   surface: content space minus the layout offset.
//! - **Native space**: device pixels of the surface's backing bitmap. Crop
//!   regions live here.
//!
//! Surface space is converted to native space by the device scale factor
//! (`native_width / displayed_width`). Skipping that factor silently produces
//! wrong crops on high-density displays.

mod map;
mod resolve;
mod types;

pub use map::map_selection;
pub use resolve::{resolve_geometry, PageView, RenderGeometry, RenderSurface};
pub use types::{CropRegion, Point, Rect, Selection};
