use crate::types::{
    BorderData, ClipData, CustomData, ImageData, RectangleData, RenderCommand, RenderData,
    TextData,
};
use trellis_types::BoundingBox;

/// A trait for render backends, abstracting the drawing primitives the
/// layout engine emits.
///
/// Implementors supply one method per primitive; [`CommandRenderer::draw`]
/// dispatches a command to the matching method. Scissor start/end arrive
/// strictly nested, so backends may maintain a simple clip-rect stack.
pub trait CommandRenderer {
    type Error;

    fn rectangle(&mut self, bounds: BoundingBox, data: &RectangleData) -> Result<(), Self::Error>;

    fn border(&mut self, bounds: BoundingBox, data: &BorderData) -> Result<(), Self::Error>;

    fn text(&mut self, bounds: BoundingBox, data: &TextData<'_>) -> Result<(), Self::Error>;

    fn image(&mut self, bounds: BoundingBox, data: &ImageData) -> Result<(), Self::Error>;

    fn custom(&mut self, bounds: BoundingBox, data: &CustomData) -> Result<(), Self::Error>;

    fn scissor_start(&mut self, bounds: BoundingBox, data: &ClipData) -> Result<(), Self::Error>;

    fn scissor_end(&mut self) -> Result<(), Self::Error>;

    fn draw(&mut self, command: &RenderCommand<'_>) -> Result<(), Self::Error> {
        let bounds = command.bounding_box;
        match &command.data {
            RenderData::Rectangle(data) => self.rectangle(bounds, data),
            RenderData::Border(data) => self.border(bounds, data),
            RenderData::Text(data) => self.text(bounds, data),
            RenderData::Image(data) => self.image(bounds, data),
            RenderData::ScissorStart(data) => self.scissor_start(bounds, data),
            RenderData::ScissorEnd => self.scissor_end(),
            RenderData::Custom(data) => self.custom(bounds, data),
        }
    }
}
