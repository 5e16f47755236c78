//! Tests for domain error construction and trace capture.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.message(), "x");
}

#[test]
fn display_includes_code_and_message() {
    let err = Error::conflict("username taken");
    assert_eq!(err.to_string(), "conflict: username taken");
}

#[test]
fn details_are_attached() {
    let err = Error::invalid_request("bad").with_details(json!({ "field": "rdb" }));
    assert_eq!(err.details(), Some(&json!({ "field": "rdb" })));
}

#[test]
fn trace_id_is_absent_outside_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn trace_id_is_captured_inside_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
        .parse()
        .expect("valid uuid");
    let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000001"));
}

#[test]
fn explicit_trace_id_overrides_scope() {
    let err = Error::forbidden("nope").with_trace_id("abc");
    assert_eq!(err.trace_id(), Some("abc"));
}

#[rstest]
#[case(ErrorCode::InvalidRequest, "\"invalid_request\"")]
#[case(ErrorCode::ServiceUnavailable, "\"service_unavailable\"")]
fn error_codes_serialise_as_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
    let rendered = serde_json::to_string(&code).expect("serialise code");
    assert_eq!(rendered, expected);
    assert_eq!(format!("\"{code}\""), expected);
}
