//! Webhook helpers for the Clarityboard API.
//!
//! Incoming webhook deliveries are signed with the endpoint's signing
//! secret. Verify the raw request body before trusting it:
//!
//! ```rust
//! use clarityboard::webhooks::{construct_event, generate_test_header};
//!
//! let payload = r#"{"id":"evt_1","type":"report.completed"}"#;
//! let header = generate_test_header(payload, "whsec_test", None).unwrap();
//!
//! let event = construct_event(payload, &header, "whsec_test").unwrap();
//! assert_eq!(event["type"], "report.completed");
//! ```
//!
//! # Error Handling
//!
//! Every verification failure is a
//! [`ClarityboardError::SignatureVerification`](crate::ClarityboardError::SignatureVerification)
//! whose details carry the offending header and payload.

mod verification;

pub use verification::{
    compute_signature, construct_event, generate_test_header, verify_header, DEFAULT_TOLERANCE,
    SIGNATURE_HEADER, SIGNATURE_SCHEME,
};
