use crate::{ModelError, WhiteboardElementBuilder};

/// **VALUE**: Verifies that a fully specified element builds unchanged.
///
/// **WHY THIS MATTERS**: The CLI's file-backed canvas producer and tests build elements
/// through this path; any field dropped here never reaches the worker.
#[test]
fn given_complete_builder_when_built_then_returns_element() {
    // GIVEN
    let builder = WhiteboardElementBuilder::default()
        .with_id("arrow-1")
        .with_kind("arrow")
        .with_position(5.0, 6.0)
        .with_points(vec![[0.0, 0.0], [40.0, 10.0]])
        .with_text("depends on");

    // WHEN
    let element = builder.build().expect("element should build");

    // THEN
    assert_eq!(element.id, "arrow-1");
    assert_eq!(element.kind, "arrow");
    assert_eq!(element.points.as_ref().map(Vec::len), Some(2));
    assert_eq!(element.width, None);
}

/// **VALUE**: Verifies that an empty id is rejected.
///
/// **BUG THIS CATCHES**: Would catch the emptiness check being removed; the worker keys
/// element diffs by id and collapses every empty-id element into one.
#[test]
fn given_empty_id_when_built_then_returns_validation_error() {
    let result = WhiteboardElementBuilder::default()
        .with_id("")
        .with_kind("rectangle")
        .with_position(0.0, 0.0)
        .build();

    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert_eq!(message, "Element id cannot be empty");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn given_missing_position_when_built_then_returns_validation_error() {
    let result = WhiteboardElementBuilder::default()
        .with_id("r")
        .with_kind("rectangle")
        .build();

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

#[test]
fn given_non_finite_position_when_built_then_returns_validation_error() {
    let result = WhiteboardElementBuilder::default()
        .with_id("r")
        .with_kind("rectangle")
        .with_position(f64::NAN, 1.0)
        .build();

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

#[test]
fn given_negative_size_when_built_then_returns_validation_error() {
    let result = WhiteboardElementBuilder::default()
        .with_id("r")
        .with_kind("rectangle")
        .with_position(0.0, 0.0)
        .with_size(-1.0, 10.0)
        .build();

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}
