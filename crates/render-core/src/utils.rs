use crate::error::RenderError;
use crate::types::{RenderCommand, RenderData};

/// Checks the scissor discipline of a command stream: every `ScissorStart`
/// has exactly one matching `ScissorEnd` later in the stream and pairs nest
/// strictly. Useful as a debug assertion in backends.
pub fn validate_scissor_nesting<'a>(
    commands: impl IntoIterator<Item = &'a RenderCommand<'a>>,
) -> Result<(), RenderError> {
    let mut depth: i32 = 0;
    for (index, command) in commands.into_iter().enumerate() {
        match command.data {
            RenderData::ScissorStart(_) => depth += 1,
            RenderData::ScissorEnd => {
                depth -= 1;
                if depth < 0 {
                    return Err(RenderError::UnbalancedScissor(format!(
                        "scissor end without matching start at command {index}"
                    )));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(RenderError::UnbalancedScissor(format!(
            "{depth} scissor region(s) left open at end of stream"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClipData, RectangleData};
    use trellis_types::BoundingBox;

    fn command(data: RenderData<'static>) -> RenderCommand<'static> {
        RenderCommand {
            bounding_box: BoundingBox::default(),
            id: 0,
            z_index: 0,
            user_data: 0,
            data,
        }
    }

    #[test]
    fn accepts_nested_scissors() {
        let commands = [
            command(RenderData::ScissorStart(ClipData::default())),
            command(RenderData::Rectangle(RectangleData::default())),
            command(RenderData::ScissorStart(ClipData::default())),
            command(RenderData::ScissorEnd),
            command(RenderData::ScissorEnd),
        ];
        assert!(validate_scissor_nesting(commands.iter()).is_ok());
    }

    #[test]
    fn rejects_unopened_end() {
        let commands = [command(RenderData::ScissorEnd)];
        assert!(validate_scissor_nesting(commands.iter()).is_err());
    }

    #[test]
    fn rejects_unclosed_start() {
        let commands = [command(RenderData::ScissorStart(ClipData::default()))];
        assert!(validate_scissor_nesting(commands.iter()).is_err());
    }
}
