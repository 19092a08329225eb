mod common;

use common::*;
use trellis::{
    BorderConfig, BorderWidth, Declaration, Dimensions, ErrorKind, LayoutConfig, LayoutContext,
    LayoutOptions, RenderData, SizingAxis, TextConfig,
};

fn declare_sample_tree(context: &mut LayoutContext) {
    context.element(&sized(fixed(300.0, 200.0)), |context| {
        context.element(&colored_box(fixed(100.0, 100.0), RED), |_| {});
        context.element(&colored_box(fixed(100.0, 100.0), BLUE), |context| {
            context.text("some label", &TextConfig::default());
        });
    });
}

#[test]
fn identical_frames_emit_identical_streams() {
    let mut context = test_context(800.0, 600.0);

    context.begin_layout();
    declare_sample_tree(&mut context);
    let first = snapshot(&context.end_layout());

    context.begin_layout();
    declare_sample_tree(&mut context);
    let second = snapshot(&context.end_layout());

    assert_eq!(first, second);
}

#[test]
fn anonymous_ids_are_stable_across_frames() {
    let mut context = test_context(800.0, 600.0);

    let ids_of_frame = |context: &mut LayoutContext| -> Vec<u32> {
        context.begin_layout();
        declare_sample_tree(context);
        context.end_layout().iter().map(|command| command.id).collect()
    };

    let first = ids_of_frame(&mut context);
    let second = ids_of_frame(&mut context);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn duplicate_ids_are_reported_and_both_elements_lay_out() {
    let mut context = test_context(800.0, 600.0);
    let errors = capture_errors(&mut context);
    context.begin_layout();
    let id = context.id("Twice");
    context.element_with_id(id, &colored_box(fixed(10.0, 10.0), RED), |_| {});
    context.element_with_id(id, &colored_box(fixed(99.0, 99.0), BLUE), |_| {});
    let commands = context.end_layout();

    // The warning fires once; layout itself continues for both elements.
    assert_eq!(
        errors
            .borrow()
            .iter()
            .filter(|kind| **kind == ErrorKind::DuplicateId)
            .count(),
        1
    );
    assert_eq!(commands.len(), 2);
}

#[test]
fn unbalanced_open_close_is_reported() {
    let mut context = test_context(800.0, 600.0);
    let errors = capture_errors(&mut context);
    context.begin_layout();
    context.open_element();
    context.configure_open(&Declaration::default());
    // Missing close_element.
    context.end_layout();
    assert!(errors.borrow().contains(&ErrorKind::UnbalancedOpenClose));
}

#[test]
fn percent_over_one_is_reported() {
    let mut context = test_context(800.0, 600.0);
    let errors = capture_errors(&mut context);
    context.begin_layout();
    context.element(
        &sized(trellis::Sizing {
            width: SizingAxis::percent(1.5),
            height: SizingAxis::fixed(10.0),
        }),
        |_| {},
    );
    context.end_layout();
    assert!(errors.borrow().contains(&ErrorKind::PercentageOver1));
}

#[test]
fn element_capacity_overflow_latches_and_shows_a_banner() {
    init_logging();
    let mut context = LayoutContext::new(LayoutOptions {
        layout_dimensions: Dimensions::new(800.0, 600.0),
        max_element_count: 8,
        ..LayoutOptions::default()
    });
    context.set_measure_text_fn(char_measure);
    let errors = capture_errors(&mut context);

    context.begin_layout();
    for _ in 0..20 {
        context.element(&colored_box(fixed(10.0, 10.0), RED), |_| {});
    }
    let commands = context.end_layout();

    assert!(errors.borrow().contains(&ErrorKind::ElementsCapacityExceeded));
    let last = commands.get(commands.len() - 1).expect("banner command");
    match last.data {
        RenderData::Text(text) => {
            assert!(text.run.text.contains("capacity exceeded"));
        }
        _ => panic!("expected the capacity banner text, got {last:?}"),
    }
}

#[test]
fn border_emits_after_content_with_separators_on_the_gap_midline() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    context.element(
        &Declaration {
            layout: LayoutConfig {
                sizing: fixed(110.0, 40.0),
                child_gap: 10,
                ..LayoutConfig::default()
            },
            border: BorderConfig {
                color: RED,
                width: BorderWidth {
                    between_children: 2,
                    ..BorderWidth::all(1)
                },
            },
            ..Declaration::default()
        },
        |context| {
            context.element(&colored_box(fixed(50.0, 40.0), BLUE), |_| {});
            context.element(&colored_box(fixed(50.0, 40.0), BLUE), |_| {});
        },
    );
    let commands = context.end_layout();
    assert_eq!(
        kinds(&commands),
        vec!["rectangle", "rectangle", "border", "rectangle"]
    );
    // The separator sits on the midline of the 50..60 gap.
    let separator = commands.get(3).unwrap();
    assert_box(separator.bounding_box, 55.0, 0.0, 2.0, 40.0);
    match separator.data {
        RenderData::Rectangle(rectangle) => assert_eq!(rectangle.background_color, RED),
        _ => unreachable!(),
    }
}

#[test]
fn command_ids_derive_from_element_ids() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    let id = context.id("Tagged");
    context.element_with_id(id, &colored_box(fixed(10.0, 10.0), RED), |_| {});
    let commands = context.end_layout();
    assert_eq!(commands.get(0).unwrap().id, id.id);
}

#[test]
fn user_data_is_carried_through_to_commands() {
    let mut context = test_context(800.0, 600.0);
    context.begin_layout();
    context.element(
        &Declaration {
            user_data: 0xDEAD_BEEF,
            ..colored_box(fixed(10.0, 10.0), RED)
        },
        |_| {},
    );
    let commands = context.end_layout();
    assert_eq!(commands.get(0).unwrap().user_data, 0xDEAD_BEEF);
}
