//! Trellis: an immediate-mode UI layout engine.
//!
//! Hosts declare a tree of boxes every frame; the engine computes sizes,
//! positions, text wrapping, clipping and z-order, and emits a flat, ordered
//! list of renderer-agnostic draw commands. The engine has no opinion about
//! fonts or graphics APIs: text measurement comes in through a host
//! callback, drawing goes out through [`RenderCommand`]s.
//!
//! This crate is the public facade over the workspace:
//! - [`trellis_types`]: geometry, color, element identity
//! - [`trellis_render_core`]: the render-command model and backend trait
//! - [`trellis_layout`]: the engine itself
//!
//! See [`LayoutContext`] for the frame loop.

pub use trellis_layout::{
    AttachPoint, AttachPoints, BorderConfig, ChildAlignment, ClipConfig, CustomConfig,
    Declaration, ElementData, ErrorData, ErrorKind, FloatingAttachTo, FloatingClipTo,
    FloatingConfig, ImageConfig, LayoutAlignmentX, LayoutAlignmentY, LayoutConfig, LayoutContext,
    LayoutDirection, LayoutOptions, PointerCaptureMode, RenderCommandList, ScrollContainerData,
    Sizing, SizingAxis, TextAlignment, TextConfig, TextWrapMode, min_memory_size,
};
pub use trellis_render_core::{
    BorderData, BorderWidth, ClipData, CommandRenderer, CustomData, ImageData, RectangleData,
    RenderCommand, RenderData, RenderError, TextData, TextRun,
};
pub use trellis_types::{
    BoundingBox, Color, CornerRadius, Dimensions, ElementId, Padding, Vector2, hash_number,
    hash_string, hash_string_indexed,
};

/// Render-stream helpers (scissor-nesting validation).
pub mod render_utils {
    pub use trellis_render_core::utils::validate_scissor_nesting;
}
