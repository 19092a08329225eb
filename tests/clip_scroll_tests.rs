mod common;

use common::*;
use trellis::render_utils::validate_scissor_nesting;
use trellis::{ClipConfig, Declaration, LayoutConfig, Padding, RenderData, Vector2};

fn clipped(
    sizing: trellis::Sizing,
    horizontal: bool,
    vertical: bool,
    child_offset: Vector2,
) -> Declaration {
    Declaration {
        layout: LayoutConfig {
            sizing,
            ..LayoutConfig::default()
        },
        clip: ClipConfig {
            horizontal,
            vertical,
            child_offset,
        },
        ..Declaration::default()
    }
}

#[test]
fn clip_container_scissors_and_offsets_children() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    let scroll_id = context.id("Scroll");
    context.element_with_id(
        scroll_id,
        &clipped(fixed(200.0, 200.0), false, true, Vector2::new(0.0, -50.0)),
        |context| {
            context.element(&colored_box(fixed(200.0, 500.0), RED), |_| {});
        },
    );
    let commands = context.end_layout();
    assert_eq!(kinds(&commands), vec!["scissor_start", "rectangle", "scissor_end"]);
    assert_box(commands.get(0).unwrap().bounding_box, 0.0, 0.0, 200.0, 200.0);
    // The inner child is offset, not shrunk.
    assert_box(commands.get(1).unwrap().bounding_box, 0.0, -50.0, 200.0, 500.0);
    match commands.get(0).unwrap().data {
        RenderData::ScissorStart(clip) => {
            assert!(clip.vertical);
            assert!(!clip.horizontal);
        }
        _ => unreachable!(),
    }
}

#[test]
fn clipped_axis_does_not_compress_children() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    let inner = context.id("Inner");
    context.element(
        &clipped(fixed(100.0, 100.0), true, true, Vector2::zero()),
        |context| {
            context.element_with_id(inner, &sized(fixed(400.0, 400.0)), |_| {});
        },
    );
    context.end_layout();
    assert_box(context.element_data(inner).bounding_box, 0.0, 0.0, 400.0, 400.0);
}

#[test]
fn nested_scissors_stay_balanced() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    context.element(
        &clipped(fixed(400.0, 400.0), true, true, Vector2::zero()),
        |context| {
            context.element(&colored_box(fixed(50.0, 50.0), RED), |_| {});
            context.element(
                &clipped(fixed(200.0, 200.0), false, true, Vector2::zero()),
                |context| {
                    context.element(&colored_box(fixed(50.0, 50.0), BLUE), |_| {});
                },
            );
        },
    );
    let commands = context.end_layout();
    let resolved: Vec<_> = commands.iter().collect();
    validate_scissor_nesting(resolved.iter()).expect("well-nested scissors");
    assert_eq!(
        kinds(&commands),
        vec![
            "scissor_start",
            "rectangle",
            "scissor_start",
            "rectangle",
            "scissor_end",
            "scissor_end",
        ]
    );
}

#[test]
fn border_is_emitted_before_the_matching_scissor_end() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    context.element(
        &Declaration {
            border: trellis::BorderConfig {
                color: RED,
                width: trellis::BorderWidth::all(2),
            },
            ..clipped(fixed(100.0, 100.0), true, true, Vector2::zero())
        },
        |context| {
            context.element(&colored_box(fixed(40.0, 40.0), BLUE), |_| {});
        },
    );
    let commands = context.end_layout();
    assert_eq!(
        kinds(&commands),
        vec!["scissor_start", "rectangle", "border", "scissor_end"]
    );
}

#[test]
fn scroll_container_state_reports_geometry() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    let scroll_id = context.id("List");
    context.element_with_id(
        scroll_id,
        &Declaration {
            layout: LayoutConfig {
                sizing: fixed(200.0, 200.0),
                padding: Padding::all(5),
                ..LayoutConfig::default()
            },
            clip: ClipConfig {
                vertical: true,
                ..ClipConfig::default()
            },
            ..Declaration::default()
        },
        |context| {
            context.element(&sized(fixed(100.0, 500.0)), |_| {});
        },
    );
    context.end_layout();

    let data = context
        .scroll_container_data(scroll_id)
        .expect("scroll state exists");
    assert_box(data.bounding_box, 0.0, 0.0, 200.0, 200.0);
    assert_eq!(data.content_dimensions.height, 510.0);
    assert_eq!(data.scroll_position, Vector2::zero());

    context.set_scroll_position(scroll_id, Vector2::new(0.0, -120.0));
    let data = context.scroll_container_data(scroll_id).unwrap();
    assert_eq!(data.scroll_position, Vector2::new(0.0, -120.0));
}

#[test]
fn scroll_state_is_pruned_when_not_redeclared() {
    let mut context = test_context(800.0, 600.0);
    let scroll_id = context.id("Transient");

    context.begin_layout();
    context.element_with_id(
        scroll_id,
        &clipped(fixed(100.0, 100.0), false, true, Vector2::zero()),
        |_| {},
    );
    context.end_layout();
    assert!(context.scroll_container_data(scroll_id).is_some());

    // One frame without the container: still remembered until aged out.
    context.begin_layout();
    context.end_layout();
    // The following frame prunes it.
    context.begin_layout();
    context.end_layout();
    assert!(context.scroll_container_data(scroll_id).is_none());
}

#[test]
fn redeclared_containers_keep_scroll_position_across_frames() {
    let mut context = test_context(800.0, 600.0);
    let scroll_id = context.id("Persistent");
    for frame in 0..3 {
        context.begin_layout();
        context.element_with_id(
            scroll_id,
            &clipped(fixed(100.0, 100.0), false, true, Vector2::zero()),
            |context| {
                context.element(&sized(fixed(100.0, 300.0)), |_| {});
            },
        );
        context.end_layout();
        if frame == 0 {
            context.set_scroll_position(scroll_id, Vector2::new(0.0, -75.0));
        }
    }
    assert_eq!(
        context.scroll_container_data(scroll_id).unwrap().scroll_position,
        Vector2::new(0.0, -75.0)
    );
}

#[test]
fn external_scroll_handling_queries_and_skips_offsets() {
    let mut context = test_context(800.0, 600.0);
    context.set_external_scroll_handling(true);
    context.set_query_scroll_offset_fn(|_id| Vector2::new(0.0, -30.0));
    context.begin_layout();
    let scroll_id = context.id("External");
    context.element_with_id(
        scroll_id,
        // The declared child offset is ignored in external mode.
        &clipped(fixed(200.0, 200.0), false, true, Vector2::new(0.0, -999.0)),
        |context| {
            context.element(&colored_box(fixed(200.0, 500.0), RED), |_| {});
        },
    );
    let commands = context.end_layout();
    // The renderer translates scissored content itself, so the child stays
    // at its unscrolled position.
    assert_box(commands.get(1).unwrap().bounding_box, 0.0, 0.0, 200.0, 500.0);
    drop(commands);
    assert_eq!(
        context.scroll_container_data(scroll_id).unwrap().scroll_position,
        Vector2::new(0.0, -30.0)
    );
}
