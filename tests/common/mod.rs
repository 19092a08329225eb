#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use trellis::{
    BoundingBox, Color, Declaration, Dimensions, ErrorKind, LayoutConfig, LayoutContext,
    LayoutOptions, RenderCommand, RenderCommandList, RenderData, Sizing, SizingAxis, TextConfig,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A context over a `width x height` surface with the byte-count measure
/// function installed.
pub fn test_context(width: f32, height: f32) -> LayoutContext {
    init_logging();
    let mut context = LayoutContext::new(LayoutOptions {
        layout_dimensions: Dimensions::new(width, height),
        ..LayoutOptions::default()
    });
    context.set_measure_text_fn(char_measure);
    context
}

/// Ten units per byte (spaces included), ten tall. Deterministic and easy
/// to do arithmetic against in assertions.
pub fn char_measure(text: &str, _config: &TextConfig) -> Dimensions {
    Dimensions::new(text.len() as f32 * 10.0, 10.0)
}

pub fn fixed(width: f32, height: f32) -> Sizing {
    Sizing {
        width: SizingAxis::fixed(width),
        height: SizingAxis::fixed(height),
    }
}

pub fn sized(sizing: Sizing) -> Declaration {
    Declaration {
        layout: LayoutConfig {
            sizing,
            ..LayoutConfig::default()
        },
        ..Declaration::default()
    }
}

pub fn colored_box(sizing: Sizing, color: Color) -> Declaration {
    Declaration {
        background_color: color,
        ..sized(sizing)
    }
}

pub const RED: Color = Color {
    r: 255.0,
    g: 0.0,
    b: 0.0,
    a: 255.0,
};
pub const BLUE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 255.0,
    a: 255.0,
};

/// Collects reported error kinds for assertions.
pub fn capture_errors(context: &mut LayoutContext) -> Rc<RefCell<Vec<ErrorKind>>> {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    context.set_error_handler(move |error| sink.borrow_mut().push(error.kind));
    errors
}

/// Owned, comparable rendering of a command stream.
pub fn snapshot(commands: &RenderCommandList<'_>) -> Vec<String> {
    commands
        .iter()
        .map(|command| format!("{command:?}"))
        .collect()
}

pub fn kind_name(command: &RenderCommand<'_>) -> &'static str {
    match command.data {
        RenderData::Rectangle(_) => "rectangle",
        RenderData::Border(_) => "border",
        RenderData::Text(_) => "text",
        RenderData::Image(_) => "image",
        RenderData::ScissorStart(_) => "scissor_start",
        RenderData::ScissorEnd => "scissor_end",
        RenderData::Custom(_) => "custom",
    }
}

/// The command kinds in stream order.
pub fn kinds(commands: &RenderCommandList<'_>) -> Vec<&'static str> {
    commands.iter().map(|command| kind_name(&command)).collect()
}

/// The text contents of every text command, in stream order.
pub fn text_lines(commands: &RenderCommandList<'_>) -> Vec<String> {
    commands
        .iter()
        .filter_map(|command| match command.data {
            RenderData::Text(text) => Some(text.run.text.to_string()),
            _ => None,
        })
        .collect()
}

#[track_caller]
pub fn assert_box(actual: BoundingBox, x: f32, y: f32, width: f32, height: f32) {
    let eps = 0.05;
    assert!(
        (actual.x - x).abs() < eps
            && (actual.y - y).abs() < eps
            && (actual.width - width).abs() < eps
            && (actual.height - height).abs() < eps,
        "bounding box {actual:?} != ({x}, {y}, {width}, {height})"
    );
}
