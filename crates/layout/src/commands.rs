//! Internal render-command storage and the borrowed view handed to hosts.
//!
//! Commands are built into a fixed pool during emission with text carried
//! as byte ranges of the frame text buffer; [`RenderCommandList`] resolves
//! those ranges into `&str` slices on the way out, so the public stream
//! borrows the frame instead of copying it.

use crate::store::Span;
use trellis_render_core::{
    BorderData, ClipData, CustomData, ImageData, RectangleData, RenderCommand, RenderData,
    TextData, TextRun,
};
use trellis_types::{BoundingBox, Color};

#[derive(Debug, Clone, Copy)]
pub(crate) struct RawRenderCommand {
    pub bounding_box: BoundingBox,
    pub id: u32,
    pub z_index: i16,
    pub user_data: u64,
    pub data: RawRenderData,
}

impl Default for RawRenderCommand {
    fn default() -> Self {
        Self {
            bounding_box: BoundingBox::default(),
            id: 0,
            z_index: 0,
            user_data: 0,
            data: RawRenderData::Rectangle(RectangleData::default()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum RawRenderData {
    Rectangle(RectangleData),
    Border(BorderData),
    Text(RawTextData),
    Image(ImageData),
    ScissorStart(ClipData),
    ScissorEnd,
    Custom(CustomData),
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RawTextData {
    /// The wrapped line.
    pub line: Span,
    /// The full source string the line was sliced from.
    pub base: Span,
    pub color: Color,
    pub font_id: u16,
    pub font_size: u16,
    pub letter_spacing: u16,
    pub line_height: u16,
}

/// The ordered render-command stream for one frame.
///
/// Borrows the context until the next mutating call; commands resolve lazily
/// so iteration is allocation-free.
pub struct RenderCommandList<'frame> {
    commands: &'frame [RawRenderCommand],
    text: &'frame str,
}

impl<'frame> RenderCommandList<'frame> {
    pub(crate) fn new(commands: &'frame [RawRenderCommand], text: &'frame str) -> Self {
        Self { commands, text }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RenderCommand<'frame>> {
        self.commands
            .get(index)
            .map(|raw| resolve(raw, self.text))
    }

    pub fn iter(&self) -> RenderCommandIter<'frame> {
        RenderCommandIter {
            commands: self.commands.iter(),
            text: self.text,
        }
    }
}

impl<'frame> IntoIterator for &RenderCommandList<'frame> {
    type Item = RenderCommand<'frame>;
    type IntoIter = RenderCommandIter<'frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct RenderCommandIter<'frame> {
    commands: std::slice::Iter<'frame, RawRenderCommand>,
    text: &'frame str,
}

impl<'frame> Iterator for RenderCommandIter<'frame> {
    type Item = RenderCommand<'frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.commands.next().map(|raw| resolve(raw, self.text))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.commands.size_hint()
    }
}

impl ExactSizeIterator for RenderCommandIter<'_> {}

fn resolve<'frame>(raw: &RawRenderCommand, text: &'frame str) -> RenderCommand<'frame> {
    let data = match raw.data {
        RawRenderData::Rectangle(data) => RenderData::Rectangle(data),
        RawRenderData::Border(data) => RenderData::Border(data),
        RawRenderData::Image(data) => RenderData::Image(data),
        RawRenderData::ScissorStart(data) => RenderData::ScissorStart(data),
        RawRenderData::ScissorEnd => RenderData::ScissorEnd,
        RawRenderData::Custom(data) => RenderData::Custom(data),
        RawRenderData::Text(data) => RenderData::Text(TextData {
            run: TextRun {
                text: &text[data.line.start as usize..data.line.end() as usize],
                base: &text[data.base.start as usize..data.base.end() as usize],
                byte_offset: (data.line.start - data.base.start) as usize,
            },
            color: data.color,
            font_id: data.font_id,
            font_size: data.font_size,
            letter_spacing: data.letter_spacing,
            line_height: data.line_height,
        }),
    };
    RenderCommand {
        bounding_box: raw.bounding_box,
        id: raw.id,
        z_index: raw.z_index,
        user_data: raw.user_data,
        data,
    }
}
