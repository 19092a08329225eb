//! Persistent scroll-container state.
//!
//! Declaring a clip element binds (or creates) an entry here; entries carry
//! scroll positions across frames. The engine records geometry into the
//! entry during emission but never moves the scroll position itself - the
//! host updates it between frames, or supplies offsets via the query
//! callback in external scroll handling mode.

use trellis_types::{BoundingBox, Dimensions, Vector2};

#[derive(Debug, Clone, Copy)]
pub(crate) struct ScrollContainer {
    pub element_id: u32,
    pub element_index: u32,
    /// Final on-surface box of the container, recorded during emission.
    pub bounding_box: BoundingBox,
    /// Size of the laid-out content inside the container, padding included.
    pub content_size: Dimensions,
    pub scroll_origin: Vector2,
    pub scroll_position: Vector2,
    /// Entries not re-declared by the next frame are pruned.
    pub open_this_frame: bool,
}

impl Default for ScrollContainer {
    fn default() -> Self {
        Self {
            element_id: 0,
            element_index: 0,
            bounding_box: BoundingBox::default(),
            content_size: Dimensions::default(),
            scroll_origin: Vector2::new(-1.0, -1.0),
            scroll_position: Vector2::zero(),
            open_this_frame: false,
        }
    }
}

/// Host-visible snapshot of one scroll container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollContainerData {
    pub scroll_position: Vector2,
    pub bounding_box: BoundingBox,
    pub content_dimensions: Dimensions,
}
