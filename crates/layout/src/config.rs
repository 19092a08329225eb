//! The public declaration model: everything a host can say about an element
//! before the solver runs.

use trellis_render_core::BorderWidth;
use trellis_types::{Color, CornerRadius, Dimensions, Padding, Vector2};

/// Which axis children are laid out along.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    TopToBottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutAlignmentX {
    #[default]
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutAlignmentY {
    #[default]
    Top,
    Bottom,
    Center,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildAlignment {
    pub x: LayoutAlignmentX,
    pub y: LayoutAlignmentY,
}

/// How an element sizes itself along one axis.
///
/// The default is `Fit { min: 0, max: 0 }`; a max of 0 means "unbounded".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingAxis {
    /// Size to content, clamped to `[min, max]`.
    Fit { min: f32, max: f32 },
    /// Take a share of the parent's spare space, clamped to `[min, max]`.
    Grow { min: f32, max: f32 },
    /// A fraction of the parent's inner size, `0.0..=1.0`.
    Percent(f32),
    /// An exact size.
    Fixed(f32),
}

impl Default for SizingAxis {
    fn default() -> Self {
        SizingAxis::Fit { min: 0.0, max: 0.0 }
    }
}

impl SizingAxis {
    pub fn fit() -> Self {
        Self::default()
    }

    pub fn grow() -> Self {
        SizingAxis::Grow { min: 0.0, max: 0.0 }
    }

    pub fn fixed(size: f32) -> Self {
        SizingAxis::Fixed(size)
    }

    pub fn percent(fraction: f32) -> Self {
        SizingAxis::Percent(fraction)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sizing {
    pub width: SizingAxis,
    pub height: SizingAxis,
}

/// Size and position settings for an element and its children.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutConfig {
    pub sizing: Sizing,
    pub padding: Padding,
    /// Gap between adjacent children along the layout axis.
    pub child_gap: u16,
    pub child_alignment: ChildAlignment,
    pub direction: LayoutDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextWrapMode {
    /// Wrap greedily on word boundaries (spaces and newlines).
    #[default]
    Words,
    /// Only break on explicit newline characters.
    Newlines,
    /// Never wrap; the text keeps its measured width.
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Settings for a text element. The fields that affect measurement
/// (font id, size, spacing) also key the measurement cache.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextConfig {
    pub color: Color,
    /// Host-defined font identifier, passed through to the measure function
    /// and render commands.
    pub font_id: u16,
    pub font_size: u16,
    pub letter_spacing: u16,
    /// Overrides the measured line height when non-zero.
    pub line_height: u16,
    pub wrap_mode: TextWrapMode,
    pub alignment: TextAlignment,
    pub user_data: u64,
}

/// One of nine anchor points on a rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttachPoint {
    #[default]
    LeftTop,
    LeftCenter,
    LeftBottom,
    CenterTop,
    CenterCenter,
    CenterBottom,
    RightTop,
    RightCenter,
    RightBottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachPoints {
    /// Anchor on the floating element itself.
    pub element: AttachPoint,
    /// Anchor on the parent it attaches to.
    pub parent: AttachPoint,
}

/// What a floating element attaches to. `None` (the default) means the
/// element is not floating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FloatingAttachTo {
    #[default]
    None,
    Parent,
    ElementWithId,
    Root,
}

/// Whether a floating element is clipped to the clip container its
/// attached parent lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FloatingClipTo {
    #[default]
    AttachedParent,
    None,
}

/// Carried as declaration data for host-side hit testing; the engine does
/// not process pointer input itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerCaptureMode {
    #[default]
    Capture,
    Passthrough,
}

/// Settings for floating elements: layered over the top of other elements
/// in z order, not affecting the size or position of siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatingConfig {
    /// Offset from the resolved attach position.
    pub offset: Vector2,
    /// Inflates the final bounding box on both axes.
    pub expand: Dimensions,
    /// Target element id when `attach_to` is `ElementWithId`.
    pub parent_id: u32,
    pub z_index: i16,
    pub attach_points: AttachPoints,
    pub attach_to: FloatingAttachTo,
    pub clip_to: FloatingClipTo,
    pub pointer_capture_mode: PointerCaptureMode,
}

/// Clipping and scroll-offset settings. An element with either axis set
/// clips its children and anchors persistent scroll state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClipConfig {
    pub horizontal: bool,
    pub vertical: bool,
    /// Offset applied to child positions, typically the host's current
    /// scroll position for this container.
    pub child_offset: Vector2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderConfig {
    pub color: Color,
    pub width: BorderWidth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageConfig {
    /// Opaque host handle identifying the image resource.
    pub data: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomConfig {
    /// Opaque host handle passed through on the custom render command.
    pub data: u64,
}

/// Everything that can be attached to an open element in one call.
///
/// Sub-configs are attached only when set to something other than their
/// default: a transparent background emits nothing, `aspect_ratio` 0 means
/// no aspect constraint, `floating.attach_to == None` means not floating,
/// a `clip` with both axes false does not clip, an all-zero border width
/// draws no border.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Declaration {
    pub layout: LayoutConfig,
    pub background_color: Color,
    pub corner_radius: CornerRadius,
    /// Width / height ratio kept through both solver passes.
    pub aspect_ratio: f32,
    pub image: Option<ImageConfig>,
    pub floating: FloatingConfig,
    pub custom: Option<CustomConfig>,
    pub clip: ClipConfig,
    pub border: BorderConfig,
    /// Opaque host data carried through to this element's render commands.
    pub user_data: u64,
}
