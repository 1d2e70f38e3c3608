use crate::RedactedSecret;

/// **VALUE**: Verifies that neither `Debug` nor `Display` reveal the secret.
///
/// **WHY THIS MATTERS**: Session tokens and passwords pass through structs that are
/// logged with `{:?}`. A leak here puts live credentials in log files.
///
/// **BUG THIS CATCHES**: Would catch someone replacing the manual impls with `#[derive(Debug)]`.
#[test]
fn given_secret_when_formatted_then_value_is_hidden() {
    // GIVEN: A session token
    let secret = RedactedSecret::new("tok-123456");

    // WHEN: Formatting both ways
    let debug = format!("{secret:?}");
    let display = format!("{secret}");

    // THEN: The raw value appears in neither
    assert!(!debug.contains("tok-123456"));
    assert!(!display.contains("tok-123456"));
    assert_eq!(secret.expose(), "tok-123456");
}

/// **VALUE**: Verifies that serde refuses to serialize a secret.
///
/// **BUG THIS CATCHES**: Would catch a derive(Serialize) that quietly writes tokens into
/// config files or JSON logs.
#[test]
fn given_secret_when_serialized_then_returns_error() {
    let secret = RedactedSecret::from("hunter2");

    let result = serde_json::to_string(&secret);

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("expose()"));
    assert!(!message.contains("hunter2"));
}

#[test]
fn given_secret_when_measured_then_reports_length_only() {
    let secret = RedactedSecret::from(String::from("abc"));

    assert_eq!(secret.len(), 3);
    assert!(!secret.is_empty());
    assert!(RedactedSecret::new("").is_empty());
}
