use trellis_types::{BoundingBox, Color, CornerRadius};

/// Per-side border thickness, in layout units.
///
/// `between_children` draws separator lines on the gap midline between an
/// element's children, in addition to the four outer sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderWidth {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
    pub between_children: u16,
}

impl BorderWidth {
    pub fn all(width: u16) -> Self {
        Self {
            left: width,
            right: width,
            top: width,
            bottom: width,
            between_children: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A single unit of drawing work. Commands arrive in presentation order:
/// the renderer executes them front to back without reordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand<'frame> {
    /// Final on-surface rectangle of the element this command belongs to.
    pub bounding_box: BoundingBox,
    /// Id of the originating element, or an id derived from it for
    /// secondary commands (scissors, borders, text lines).
    pub id: u32,
    /// Z-index of the layout root this command was emitted under.
    pub z_index: i16,
    /// Opaque host data carried through from the element declaration.
    pub user_data: u64,
    pub data: RenderData<'frame>,
}

/// The drawing payload of a [`RenderCommand`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderData<'frame> {
    Rectangle(RectangleData),
    Border(BorderData),
    Text(TextData<'frame>),
    Image(ImageData),
    ScissorStart(ClipData),
    ScissorEnd,
    Custom(CustomData),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectangleData {
    pub background_color: Color,
    pub corner_radius: CornerRadius,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderData {
    pub color: Color,
    pub corner_radius: CornerRadius,
    pub width: BorderWidth,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextData<'frame> {
    pub run: TextRun<'frame>,
    pub color: Color,
    pub font_id: u16,
    pub font_size: u16,
    pub letter_spacing: u16,
    pub line_height: u16,
}

/// One wrapped line of text, together with the full source string it was
/// sliced from so hosts can reconstruct byte offsets (for shaping caches
/// keyed on the whole paragraph, cursor mapping, and similar).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRun<'frame> {
    pub text: &'frame str,
    pub base: &'frame str,
    pub byte_offset: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageData {
    pub background_color: Color,
    pub corner_radius: CornerRadius,
    /// Opaque host handle identifying the image resource.
    pub image: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipData {
    pub horizontal: bool,
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CustomData {
    pub background_color: Color,
    pub corner_radius: CornerRadius,
    /// Opaque host handle identifying whatever should be drawn here.
    pub custom: u64,
}
