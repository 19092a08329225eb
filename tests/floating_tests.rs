mod common;

use common::*;
use trellis::{
    AttachPoint, AttachPoints, ClipConfig, Declaration, Dimensions, ErrorKind, FloatingAttachTo,
    FloatingClipTo, FloatingConfig, LayoutConfig, Padding, Vector2,
};

fn floating_box(config: FloatingConfig, sizing: trellis::Sizing) -> Declaration {
    Declaration {
        floating: config,
        ..colored_box(sizing, BLUE)
    }
}

#[test]
fn floating_attaches_to_an_element_by_id() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    let anchor = context.id("A");
    // Pad the anchor into position (100, 100).
    context.element(
        &Declaration {
            layout: LayoutConfig {
                padding: Padding::new(100, 0, 100, 0),
                ..LayoutConfig::default()
            },
            ..Declaration::default()
        },
        |context| {
            context.element_with_id(anchor, &colored_box(fixed(50.0, 50.0), RED), |_| {});
        },
    );
    context.element(
        &floating_box(
            FloatingConfig {
                attach_to: FloatingAttachTo::ElementWithId,
                parent_id: anchor.id,
                attach_points: AttachPoints {
                    parent: AttachPoint::RightTop,
                    element: AttachPoint::LeftTop,
                },
                offset: Vector2::new(5.0, 0.0),
                ..FloatingConfig::default()
            },
            fixed(40.0, 30.0),
        ),
        |_| {},
    );
    let commands = context.end_layout();
    assert_box(commands.get(0).unwrap().bounding_box, 100.0, 100.0, 50.0, 50.0);
    // Parent right-top (155 with offset 5) meets the element's left-top.
    assert_box(commands.get(1).unwrap().bounding_box, 155.0, 100.0, 40.0, 30.0);
}

#[test]
fn floating_children_do_not_affect_parent_size() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    let parent = context.id("FitParent");
    context.element_with_id(parent, &Declaration::default(), |context| {
        context.element(
            &floating_box(
                FloatingConfig {
                    attach_to: FloatingAttachTo::Parent,
                    ..FloatingConfig::default()
                },
                fixed(300.0, 300.0),
            ),
            |_| {},
        );
    });
    context.end_layout();
    let data = context.element_data(parent);
    assert_eq!(data.bounding_box.width, 0.0);
    assert_eq!(data.bounding_box.height, 0.0);
}

#[test]
fn roots_emit_in_ascending_z_order() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    context.element(&colored_box(fixed(100.0, 100.0), RED), |context| {
        context.element(
            &floating_box(
                FloatingConfig {
                    attach_to: FloatingAttachTo::Parent,
                    z_index: 5,
                    ..FloatingConfig::default()
                },
                fixed(10.0, 10.0),
            ),
            |_| {},
        );
        context.element(
            &floating_box(
                FloatingConfig {
                    attach_to: FloatingAttachTo::Parent,
                    z_index: 2,
                    ..FloatingConfig::default()
                },
                fixed(10.0, 10.0),
            ),
            |_| {},
        );
    });
    let commands = context.end_layout();
    let z_order: Vec<i16> = commands.iter().map(|command| command.z_index).collect();
    assert_eq!(z_order, vec![0, 2, 5]);
}

#[test]
fn grow_floating_takes_the_parent_size() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    let anchor = context.id("GrowAnchor");
    let overlay = context.id("Overlay");
    context.element_with_id(anchor, &colored_box(fixed(120.0, 80.0), RED), |context| {
        context.element_with_id(
            overlay,
            &floating_box(
                FloatingConfig {
                    attach_to: FloatingAttachTo::Parent,
                    ..FloatingConfig::default()
                },
                trellis::Sizing {
                    width: trellis::SizingAxis::grow(),
                    height: trellis::SizingAxis::percent(0.5),
                },
            ),
            |_| {},
        );
    });
    context.end_layout();
    let data = context.element_data(overlay);
    assert_eq!(data.bounding_box.width, 120.0);
    assert_eq!(data.bounding_box.height, 40.0);
}

#[test]
fn expand_inflates_the_bounding_box() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    context.element(&colored_box(fixed(100.0, 100.0), RED), |context| {
        context.element(
            &floating_box(
                FloatingConfig {
                    attach_to: FloatingAttachTo::Parent,
                    expand: Dimensions::new(10.0, 5.0),
                    ..FloatingConfig::default()
                },
                fixed(40.0, 40.0),
            ),
            |_| {},
        );
    });
    let commands = context.end_layout();
    assert_box(commands.get(1).unwrap().bounding_box, -10.0, -5.0, 60.0, 50.0);
}

#[test]
fn missing_floating_parent_is_reported() {
    let mut context = test_context(800.0, 600.0);
    let errors = capture_errors(&mut context);
    context.begin_layout();
    context.element(
        &floating_box(
            FloatingConfig {
                attach_to: FloatingAttachTo::ElementWithId,
                parent_id: context.id("NeverDeclared").id,
                ..FloatingConfig::default()
            },
            fixed(10.0, 10.0),
        ),
        |_| {},
    );
    context.end_layout();
    assert!(errors
        .borrow()
        .contains(&ErrorKind::FloatingContainerParentNotFound));
}

#[test]
fn floating_inside_a_clip_container_is_scissored_with_it() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    context.element(
        &Declaration {
            clip: ClipConfig {
                vertical: true,
                ..ClipConfig::default()
            },
            ..colored_box(fixed(200.0, 200.0), RED)
        },
        |context| {
            context.element(
                &floating_box(
                    FloatingConfig {
                        attach_to: FloatingAttachTo::Parent,
                        ..FloatingConfig::default()
                    },
                    fixed(20.0, 20.0),
                ),
                |_| {},
            );
        },
    );
    let commands = context.end_layout();
    // Main root: scissor + rectangle + end; floating root re-opens the
    // clip around its own content.
    assert_eq!(
        kinds(&commands),
        vec![
            "scissor_start",
            "rectangle",
            "scissor_end",
            "scissor_start",
            "rectangle",
            "scissor_end",
        ]
    );
    assert_box(commands.get(3).unwrap().bounding_box, 0.0, 0.0, 200.0, 200.0);
}

#[test]
fn clip_to_none_escapes_the_clip_container() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    context.element(
        &Declaration {
            clip: ClipConfig {
                vertical: true,
                ..ClipConfig::default()
            },
            ..colored_box(fixed(200.0, 200.0), RED)
        },
        |context| {
            context.element(
                &floating_box(
                    FloatingConfig {
                        attach_to: FloatingAttachTo::Parent,
                        clip_to: FloatingClipTo::None,
                        ..FloatingConfig::default()
                    },
                    fixed(20.0, 20.0),
                ),
                |_| {},
            );
        },
    );
    let commands = context.end_layout();
    assert_eq!(
        kinds(&commands),
        vec!["scissor_start", "rectangle", "scissor_end", "rectangle"]
    );
}
