//! An immediate-mode UI layout engine.
//!
//! Hosts declare a tree of boxes every frame; the engine solves sizes,
//! positions, text wrapping, clipping and z-order, then emits a flat,
//! ordered list of renderer-agnostic draw commands. All working memory is
//! reserved once at construction against a byte budget; frames never
//! allocate.
//!
//! The frame loop:
//!
//! ```no_run
//! use trellis_layout::{Declaration, LayoutConfig, LayoutContext, LayoutOptions, Sizing, SizingAxis};
//! use trellis_types::Dimensions;
//!
//! let mut ctx = LayoutContext::new(LayoutOptions {
//!     layout_dimensions: Dimensions::new(800.0, 600.0),
//!     ..LayoutOptions::default()
//! });
//! ctx.set_measure_text_fn(|text, config| {
//!     Dimensions::new(text.len() as f32 * 8.0, f32::from(config.font_size))
//! });
//!
//! loop {
//!     ctx.begin_layout();
//!     ctx.element(&Declaration {
//!         layout: LayoutConfig {
//!             sizing: Sizing {
//!                 width: SizingAxis::grow(),
//!                 height: SizingAxis::fixed(40.0),
//!             },
//!             ..LayoutConfig::default()
//!         },
//!         ..Declaration::default()
//!     }, |_ctx| {});
//!     let commands = ctx.end_layout();
//!     for command in &commands {
//!         // hand off to the renderer
//!         let _ = command;
//!     }
//!     # break;
//! }
//! ```

use thiserror::Error;

mod builder;
mod commands;
mod config;
mod context;
mod element;
mod emit;
mod measure;
mod scroll;
mod solver;
mod store;
mod wrap;

pub use commands::RenderCommandList;
pub use config::{
    AttachPoint, AttachPoints, BorderConfig, ChildAlignment, ClipConfig, CustomConfig,
    Declaration, FloatingAttachTo, FloatingClipTo, FloatingConfig, ImageConfig, LayoutAlignmentX,
    LayoutAlignmentY, LayoutConfig, LayoutDirection, PointerCaptureMode, Sizing, SizingAxis,
    TextAlignment, TextConfig, TextWrapMode,
};
pub use context::{ElementData, LayoutContext, LayoutOptions, min_memory_size};
pub use scroll::ScrollContainerData;

/// The failure taxonomy reported through the error handler.
///
/// The engine never panics: every fault is reported once per occurrence and
/// the frame continues on a best-effort basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("text measurement function not provided")]
    TextMeasurementFunctionNotProvided,
    #[error("arena capacity exceeded")]
    ArenaCapacityExceeded,
    #[error("element capacity exceeded")]
    ElementsCapacityExceeded,
    #[error("text measurement capacity exceeded")]
    TextMeasurementCapacityExceeded,
    #[error("duplicate element id")]
    DuplicateId,
    #[error("floating container parent not found")]
    FloatingContainerParentNotFound,
    #[error("percentage value over 1.0")]
    PercentageOver1,
    #[error("unbalanced open/close calls")]
    UnbalancedOpenClose,
    #[error("internal error")]
    Internal,
}

/// A single reported fault, passed to the host's error handler.
#[derive(Debug, Clone, Copy)]
pub struct ErrorData {
    pub kind: ErrorKind,
    pub message: &'static str,
}
