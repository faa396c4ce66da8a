//! Integration tests for webhook signature verification.

use clarityboard::webhooks::{
    compute_signature, construct_event, generate_test_header, verify_header, DEFAULT_TOLERANCE,
    SIGNATURE_HEADER,
};
use clarityboard::ClarityboardError;

const SECRET: &str = "whsec_integration";

fn payload() -> String {
    serde_json::json!({
        "id": "evt_123",
        "type": "report.completed",
        "data": {"report": "rep_1"}
    })
    .to_string()
}

#[test]
fn test_signature_header_name() {
    assert_eq!(SIGNATURE_HEADER, "Clarityboard-Signature");
}

#[test]
fn test_construct_event_round_trip() {
    let payload = payload();
    let header = generate_test_header(&payload, SECRET, None).unwrap();

    let event = construct_event(&payload, &header, SECRET).unwrap();

    assert_eq!(event["type"], "report.completed");
    assert_eq!(event["data"]["report"], "rep_1");
}

#[test]
fn test_hand_built_header_verifies() {
    let payload = payload();
    let timestamp = chrono::Utc::now().timestamp();
    let signature = compute_signature(&payload, SECRET, timestamp).unwrap();
    let header = format!("t={timestamp}, v1={signature}");

    assert!(verify_header(&payload, &header, SECRET, Some(DEFAULT_TOLERANCE)).is_ok());
}

#[test]
fn test_failures_are_signature_verification_errors() {
    let payload = payload();
    let header = generate_test_header(&payload, SECRET, None).unwrap();

    let error = construct_event(&payload, &header, "whsec_wrong").unwrap_err();

    assert!(matches!(error, ClarityboardError::SignatureVerification(_)));
    assert_eq!(error.type_name(), "ClarityboardSignatureVerificationError");
    assert_eq!(error.details().raw["header"], header.as_str());
    assert_eq!(error.details().raw["payload"], payload.as_str());
}

#[test]
fn test_stale_delivery_is_rejected() {
    let payload = payload();
    let stale = chrono::Utc::now().timestamp() - 3600;
    let header = generate_test_header(&payload, SECRET, Some(stale)).unwrap();

    let error = construct_event(&payload, &header, SECRET).unwrap_err();
    assert!(matches!(error, ClarityboardError::SignatureVerification(_)));
}
