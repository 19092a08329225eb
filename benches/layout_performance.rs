use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trellis::{
    ChildAlignment, ClipConfig, Color, Declaration, Dimensions, LayoutAlignmentY, LayoutConfig,
    LayoutContext, LayoutOptions, Padding, Sizing, SizingAxis, TextConfig, LayoutDirection,
};

fn measure(text: &str, config: &TextConfig) -> Dimensions {
    let size = f32::from(config.font_size.max(16));
    Dimensions::new(text.len() as f32 * size * 0.5, size)
}

/// A plausible app frame: a sidebar of rows, a scrolling content column of
/// cards, each with a label.
fn declare_frame(context: &mut LayoutContext) {
    context.begin_layout();
    context.element(
        &Declaration {
            layout: LayoutConfig {
                sizing: Sizing {
                    width: SizingAxis::grow(),
                    height: SizingAxis::grow(),
                },
                child_gap: 8,
                ..LayoutConfig::default()
            },
            ..Declaration::default()
        },
        |context| {
            // Sidebar
            context.element(
                &Declaration {
                    layout: LayoutConfig {
                        sizing: Sizing {
                            width: SizingAxis::fixed(240.0),
                            height: SizingAxis::grow(),
                        },
                        direction: LayoutDirection::TopToBottom,
                        padding: Padding::all(12),
                        child_gap: 4,
                        ..LayoutConfig::default()
                    },
                    background_color: Color::rgb(40.0, 40.0, 48.0),
                    ..Declaration::default()
                },
                |context| {
                    for row in 0..24 {
                        context.element_with_id(
                            context.idi("SidebarRow", row),
                            &Declaration {
                                layout: LayoutConfig {
                                    sizing: Sizing {
                                        width: SizingAxis::grow(),
                                        height: SizingAxis::fixed(28.0),
                                    },
                                    child_alignment: ChildAlignment {
                                        y: LayoutAlignmentY::Center,
                                        ..ChildAlignment::default()
                                    },
                                    padding: Padding::new(8, 8, 0, 0),
                                    ..LayoutConfig::default()
                                },
                                background_color: Color::rgb(56.0, 56.0, 64.0),
                                ..Declaration::default()
                            },
                            |context| {
                                context.text("Navigation entry", &TextConfig::default());
                            },
                        );
                    }
                },
            );
            // Scrolling content column
            context.element_with_id(
                context.id("Content"),
                &Declaration {
                    layout: LayoutConfig {
                        sizing: Sizing {
                            width: SizingAxis::grow(),
                            height: SizingAxis::grow(),
                        },
                        direction: LayoutDirection::TopToBottom,
                        padding: Padding::all(16),
                        child_gap: 12,
                        ..LayoutConfig::default()
                    },
                    clip: ClipConfig {
                        vertical: true,
                        ..ClipConfig::default()
                    },
                    ..Declaration::default()
                },
                |context| {
                    for card in 0..40 {
                        context.element_with_id(
                            context.idi("Card", card),
                            &Declaration {
                                layout: LayoutConfig {
                                    sizing: Sizing {
                                        width: SizingAxis::grow(),
                                        height: SizingAxis::fixed(96.0),
                                    },
                                    direction: LayoutDirection::TopToBottom,
                                    padding: Padding::all(10),
                                    child_gap: 6,
                                    ..LayoutConfig::default()
                                },
                                background_color: Color::rgb(255.0, 255.0, 255.0),
                                ..Declaration::default()
                            },
                            |context| {
                                context.text(
                                    "Card title with a reasonably long string of words",
                                    &TextConfig {
                                        font_size: 18,
                                        ..TextConfig::default()
                                    },
                                );
                                context.text(
                                    "Body copy that wraps across the card width when the window is narrow",
                                    &TextConfig::default(),
                                );
                            },
                        );
                    }
                },
            );
        },
    );
}

fn layout_benchmark(criterion: &mut Criterion) {
    let mut context = LayoutContext::new(LayoutOptions {
        layout_dimensions: Dimensions::new(1280.0, 720.0),
        ..LayoutOptions::default()
    });
    context.set_measure_text_fn(measure);

    criterion.bench_function("full_frame", |bencher| {
        bencher.iter(|| {
            declare_frame(&mut context);
            let commands = context.end_layout();
            black_box(commands.len())
        });
    });

    // Warm-cache text measurement dominates real frames; isolate it.
    let mut text_context = LayoutContext::new(LayoutOptions {
        layout_dimensions: Dimensions::new(1280.0, 720.0),
        ..LayoutOptions::default()
    });
    text_context.set_measure_text_fn(measure);
    criterion.bench_function("text_heavy_frame", |bencher| {
        bencher.iter(|| {
            text_context.begin_layout();
            text_context.element(
                &Declaration {
                    layout: LayoutConfig {
                        sizing: Sizing {
                            width: SizingAxis::fixed(400.0),
                            height: SizingAxis::grow(),
                        },
                        direction: LayoutDirection::TopToBottom,
                        ..LayoutConfig::default()
                    },
                    ..Declaration::default()
                },
                |context| {
                    for _ in 0..50 {
                        context.text(
                            "the quick brown fox jumps over the lazy dog and keeps on running",
                            &TextConfig::default(),
                        );
                    }
                },
            );
            let commands = text_context.end_layout();
            black_box(commands.len())
        });
    });
}

criterion_group!(benches, layout_benchmark);
criterion_main!(benches);
