//! Internal element model: declarations are resolved into flat, index-linked
//! records so the solver can walk them without chasing pointers.

use crate::config::{
    BorderConfig, ChildAlignment, ClipConfig, CustomConfig, FloatingConfig, ImageConfig,
    LayoutConfig, LayoutDirection, SizingAxis, TextConfig,
};
use crate::store::Span;
use trellis_types::{Color, CornerRadius, Dimensions, Padding};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum SizingKind {
    #[default]
    Fit,
    Grow,
    Percent,
    Fixed,
}

/// One axis of sizing with the public enum flattened out, so the solver can
/// clamp and rewrite min/max uniformly across kinds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisSizing {
    pub kind: SizingKind,
    pub min: f32,
    pub max: f32,
    pub percent: f32,
}

impl Default for AxisSizing {
    fn default() -> Self {
        Self {
            kind: SizingKind::Fit,
            min: 0.0,
            max: 0.0,
            percent: 0.0,
        }
    }
}

impl From<SizingAxis> for AxisSizing {
    fn from(sizing: SizingAxis) -> Self {
        match sizing {
            SizingAxis::Fit { min, max } => Self {
                kind: SizingKind::Fit,
                min,
                max,
                percent: 0.0,
            },
            SizingAxis::Grow { min, max } => Self {
                kind: SizingKind::Grow,
                min,
                max,
                percent: 0.0,
            },
            SizingAxis::Percent(percent) => Self {
                kind: SizingKind::Percent,
                min: 0.0,
                max: 0.0,
                percent,
            },
            SizingAxis::Fixed(size) => Self {
                kind: SizingKind::Fixed,
                min: size,
                max: size,
                percent: 0.0,
            },
        }
    }
}

impl AxisSizing {
    /// An unspecified max reads as unbounded. Resolved once at close so the
    /// solver can clamp without re-checking.
    pub fn normalize_max(&mut self) {
        if self.kind != SizingKind::Percent && self.max <= 0.0 {
            self.max = f32::MAX;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ResolvedLayout {
    pub width: AxisSizing,
    pub height: AxisSizing,
    pub padding: Padding,
    pub child_gap: u16,
    pub child_alignment: ChildAlignment,
    pub direction: LayoutDirection,
}

impl From<&LayoutConfig> for ResolvedLayout {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            width: config.sizing.width.into(),
            height: config.sizing.height.into(),
            padding: config.padding,
            child_gap: config.child_gap,
            child_alignment: config.child_alignment,
            direction: config.direction,
        }
    }
}

/// An element either owns a slice of the shared children buffer or a handle
/// into the text-element store, never both.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ElementContent {
    Children(Span),
    Text(u32),
}

impl Default for ElementContent {
    fn default() -> Self {
        ElementContent::Children(Span::default())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SharedConfig {
    pub background_color: Color,
    pub corner_radius: CornerRadius,
    pub user_data: u64,
}

/// A tagged config attached to an element. At most one of each kind per
/// element; the emitter orders them clip-first / border-last.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ElementConfig {
    Shared(SharedConfig),
    Text(TextConfig),
    Image(ImageConfig),
    Aspect(f32),
    Floating(FloatingConfig),
    Custom(CustomConfig),
    Clip(ClipConfig),
    Border(BorderConfig),
}

impl Default for ElementConfig {
    fn default() -> Self {
        ElementConfig::Shared(SharedConfig::default())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LayoutElement {
    pub id: u32,
    pub dimensions: Dimensions,
    pub min_dimensions: Dimensions,
    pub layout: ResolvedLayout,
    pub content: ElementContent,
    /// Slice into the shared config buffer.
    pub configs: Span,
    /// Floating children are tracked apart from the child slice: they do
    /// not contribute to this element's size.
    pub floating_children: u16,
}

impl LayoutElement {
    pub fn is_text(&self) -> bool {
        matches!(self.content, ElementContent::Text(_))
    }

    pub fn children(&self) -> Span {
        match self.content {
            ElementContent::Children(span) => span,
            ElementContent::Text(_) => Span::default(),
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len as usize
    }
}

/// Per-frame data for one text element.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TextElementData {
    /// The source string, as a span of the frame text buffer.
    pub text: Span,
    /// Unwrapped dimensions from the measurement cache.
    pub preferred: Dimensions,
    pub element_index: u32,
    /// Slice into the wrapped-lines buffer, filled by the wrapper.
    pub wrapped: Span,
}

/// One wrapped line: its measured dimensions and the byte range of the
/// frame text buffer it covers.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WrappedLine {
    pub dimensions: Dimensions,
    pub span: Span,
}

/// A starting point for the sizing and emission passes: the synthetic frame
/// root, plus one per floating element.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LayoutRoot {
    pub element_index: u32,
    /// Id of the attach parent for floating roots, 0 for the frame root.
    pub parent_id: u32,
    /// Id of the clip element this root is scissored against, 0 for none.
    pub clip_element_id: u32,
    pub z_index: i16,
}
