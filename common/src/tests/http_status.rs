use crate::HttpStatusCode;

#[test]
fn given_unauthorized_status_when_classified_then_is_credential_rejection() {
    let status = HttpStatusCode::from(401);

    assert!(status.is_credential_rejection());
    assert!(!status.is_server_error());
}

#[test]
fn given_server_and_client_errors_when_classified_then_only_5xx_is_server_error() {
    assert!(HttpStatusCode(500).is_server_error());
    assert!(HttpStatusCode(503).is_server_error());
    assert!(!HttpStatusCode(403).is_server_error());
    assert!(HttpStatusCode(403).is_credential_rejection());
    assert!(!HttpStatusCode(404).is_credential_rejection());
}

#[test]
fn given_status_when_displayed_then_prefixes_http() {
    assert_eq!(HttpStatusCode(418).to_string(), "HTTP 418");
}
