use crate::commands::watch::{ElementFile, read_screenshot};

use tempfile::TempDir;

const CANVAS: &str = r#"[{"id":"r1","type":"rectangle","x":1.0,"y":2.0,"width":3.0,"height":4.0}]"#;

/// **VALUE**: The watched file is read as a list of elements.
#[test]
fn given_valid_canvas_file_when_read_then_returns_elements() {
    // GIVEN: A canvas file with one rectangle
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("canvas.json");
    std::fs::write(&path, CANVAS).unwrap();

    // WHEN
    let elements = ElementFile::new(&path).read();

    // THEN
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].id, "r1");
    assert_eq!(elements[0].width, Some(3.0));
}

/// **VALUE**: A half-written file does not blank the canvas.
///
/// **BUG THIS CATCHES**: Publishing an empty element list whenever the editor saves,
/// which would make the worker discard the component.
#[test]
fn given_file_becomes_invalid_when_read_then_returns_last_good_elements() {
    // GIVEN: A file that was valid once
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("canvas.json");
    std::fs::write(&path, CANVAS).unwrap();
    let source = ElementFile::new(&path);
    source.read();

    // WHEN: It is truncated mid-write
    std::fs::write(&path, "[{\"id\":").unwrap();
    let elements = source.read();

    // THEN: Previous contents are used
    assert_eq!(elements.len(), 1);
}

#[test]
fn given_missing_file_when_read_first_time_then_returns_empty() {
    let dir = TempDir::new().unwrap();

    assert!(ElementFile::new(dir.path().join("absent.json")).read().is_empty());
}

#[test]
fn given_screenshot_file_when_read_then_returns_trimmed_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shot.b64");
    std::fs::write(&path, "aGVsbG8=\n").unwrap();

    assert_eq!(read_screenshot(Some(&path)).as_deref(), Some("aGVsbG8="));
    assert_eq!(read_screenshot(None), None);
    assert_eq!(read_screenshot(Some(&dir.path().join("missing"))), None);
}
