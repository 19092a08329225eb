//! Render-command abstractions for the trellis layout engine.
//!
//! This crate defines the backend-facing half of the engine:
//! - the [`RenderCommand`] stream model the layout engine emits
//! - the [`CommandRenderer`] trait render backends implement
//! - shared stream utilities (scissor-nesting validation)
//!
//! It holds no layout logic and can be depended on by backends without
//! pulling in the engine itself.

mod error;
mod traits;
mod types;
pub mod utils;

pub use error::RenderError;
pub use traits::CommandRenderer;
pub use types::{
    BorderData, BorderWidth, ClipData, CustomData, ImageData, RectangleData, RenderCommand,
    RenderData, TextData, TextRun,
};
