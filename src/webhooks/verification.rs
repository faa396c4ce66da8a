//! Webhook signature verification.
//!
//! Clarityboard signs every webhook delivery with HMAC-SHA256 using the
//! endpoint's signing secret, and sends the result in the
//! `Clarityboard-Signature` header:
//!
//! ```text
//! Clarityboard-Signature: t=1700000000,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! The signed message is `"<t>.<payload>"`. A header may carry several `v1`
//! signatures while a secret is being rolled; any one of them matching is
//! enough.
//!
//! # Security
//!
//! Signatures are compared in constant time. Deliveries older than the
//! tolerance are rejected to limit replays.

use std::time::Duration;

use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::clients::{ClarityboardError, ErrorDetails};

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Clarityboard-Signature";

/// The signature scheme this library verifies.
pub const SIGNATURE_SCHEME: &str = "v1";

/// Maximum accepted age of a delivery.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Computes the hex-encoded `v1` signature of `payload` signed at
/// `timestamp`.
///
/// # Errors
///
/// Returns [`ClarityboardError::SignatureVerification`] if the secret cannot
/// key an HMAC.
///
/// # Example
///
/// ```rust
/// use clarityboard::webhooks::compute_signature;
///
/// let signature = compute_signature(r#"{"id":"evt_1"}"#, "whsec_test", 1_700_000_000).unwrap();
/// assert_eq!(signature.len(), 64);
/// ```
pub fn compute_signature(
    payload: &str,
    secret: &str,
    timestamp: i64,
) -> Result<String, ClarityboardError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        ClarityboardError::SignatureVerification(ErrorDetails::new(
            "Unable to use the webhook secret as an HMAC key",
        ))
    })?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds a valid signature header for `payload`, for testing webhook
/// handlers. `timestamp` defaults to now.
///
/// # Errors
///
/// Returns any error of [`compute_signature`].
pub fn generate_test_header(
    payload: &str,
    secret: &str,
    timestamp: Option<i64>,
) -> Result<String, ClarityboardError> {
    let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let signature = compute_signature(payload, secret, timestamp)?;
    Ok(format!("t={timestamp},{SIGNATURE_SCHEME}={signature}"))
}

/// Verifies a signature header against `payload`.
///
/// A `tolerance` of `None` or zero disables the age check.
///
/// # Errors
///
/// Returns [`ClarityboardError::SignatureVerification`] if the header cannot
/// be parsed, if no signature matches, or if the delivery is older than the
/// tolerance. The error details carry the header and payload.
///
/// # Example
///
/// ```rust
/// use clarityboard::webhooks::{generate_test_header, verify_header, DEFAULT_TOLERANCE};
///
/// let payload = r#"{"id":"evt_1"}"#;
/// let header = generate_test_header(payload, "whsec_test", None).unwrap();
///
/// assert!(verify_header(payload, &header, "whsec_test", Some(DEFAULT_TOLERANCE)).is_ok());
/// assert!(verify_header(payload, &header, "whsec_other", Some(DEFAULT_TOLERANCE)).is_err());
/// ```
pub fn verify_header(
    payload: &str,
    header: &str,
    secret: &str,
    tolerance: Option<Duration>,
) -> Result<(), ClarityboardError> {
    let fail = |message: &str| verification_error(message, header, payload);

    let Some(parsed) = ParsedHeader::parse(header) else {
        return Err(fail(
            "Unable to extract timestamp and signatures from header",
        ));
    };
    if parsed.signatures.is_empty() {
        return Err(fail("No signatures found with expected scheme"));
    }

    let expected = compute_signature(payload, secret, parsed.timestamp)?;
    let matched = parsed
        .signatures
        .iter()
        .any(|signature| constant_time_compare(signature, &expected));
    if !matched {
        return Err(fail(
            "No signatures found matching the expected signature for payload. \
             Are you passing the raw request body you received from Clarityboard?",
        ));
    }

    if let Some(tolerance) = tolerance.filter(|tolerance| !tolerance.is_zero()) {
        let age = chrono::Utc::now().timestamp() - parsed.timestamp;
        if age > i64::try_from(tolerance.as_secs()).unwrap_or(i64::MAX) {
            tracing::warn!(age, "Rejected webhook outside the tolerance zone");
            return Err(fail("Timestamp outside the tolerance zone"));
        }
    }

    Ok(())
}

/// Verifies a delivery with the default tolerance and parses its payload.
///
/// # Errors
///
/// Returns any error of [`verify_header`], and
/// [`ClarityboardError::Api`] if the verified payload is not JSON.
pub fn construct_event(payload: &str, header: &str, secret: &str) -> Result<Value, ClarityboardError> {
    verify_header(payload, header, secret, Some(DEFAULT_TOLERANCE))?;

    serde_json::from_str(payload).map_err(|error| {
        let mut details = ErrorDetails::new(crate::rest::INVALID_JSON_MESSAGE);
        details.detail = Some(error.to_string());
        details.raw = Value::String(payload.to_string());
        ClarityboardError::Api(details)
    })
}

struct ParsedHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

impl<'a> ParsedHeader<'a> {
    fn parse(header: &'a str) -> Option<Self> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for item in header.split(',') {
            let Some((key, value)) = item.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" if timestamp.is_none() => timestamp = value.parse::<i64>().ok(),
                SIGNATURE_SCHEME => signatures.push(value),
                _ => {}
            }
        }

        Some(Self {
            timestamp: timestamp?,
            signatures,
        })
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn verification_error(message: &str, header: &str, payload: &str) -> ClarityboardError {
    let mut details = ErrorDetails::new(message);
    details.raw = json!({ "header": header, "payload": payload });
    ClarityboardError::SignatureVerification(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &str = r#"{"id":"evt_test_webhook","object":"event"}"#;

    #[test]
    fn test_compute_signature_is_deterministic_hex() {
        let first = compute_signature(PAYLOAD, SECRET, 12345).unwrap();
        let second = compute_signature(PAYLOAD, SECRET, 12345).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, compute_signature(PAYLOAD, SECRET, 12346).unwrap());
    }

    #[test]
    fn test_generate_test_header_format() {
        let header = generate_test_header(PAYLOAD, SECRET, Some(12345)).unwrap();
        let signature = compute_signature(PAYLOAD, SECRET, 12345).unwrap();
        assert_eq!(header, format!("t=12345,v1={signature}"));
    }

    #[test]
    fn test_verify_valid_header() {
        let header = generate_test_header(PAYLOAD, SECRET, None).unwrap();
        assert!(verify_header(PAYLOAD, &header, SECRET, Some(DEFAULT_TOLERANCE)).is_ok());
    }

    #[test]
    fn test_verify_rejects_malformed_header() {
        let error = verify_header(PAYLOAD, "garbage", SECRET, None).unwrap_err();

        assert!(matches!(error, ClarityboardError::SignatureVerification(_)));
        assert_eq!(error.details().raw["header"], "garbage");
        assert_eq!(error.details().raw["payload"], PAYLOAD);
    }

    #[test]
    fn test_verify_rejects_header_without_scheme() {
        let error = verify_header(PAYLOAD, "t=12345,v0=abc", SECRET, None).unwrap_err();
        assert_eq!(error.to_string(), "No signatures found with expected scheme");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let header = generate_test_header(PAYLOAD, "whsec_other", None).unwrap();
        let error = verify_header(PAYLOAD, &header, SECRET, None).unwrap_err();

        assert!(error.to_string().starts_with("No signatures found matching"));
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let header = generate_test_header(PAYLOAD, SECRET, None).unwrap();
        assert!(verify_header("{}", &header, SECRET, None).is_err());
    }

    #[test]
    fn test_verify_accepts_any_matching_signature() {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_signature(PAYLOAD, SECRET, timestamp).unwrap();
        let header = format!("t={timestamp},v1=bad_signature,v1={signature}");

        assert!(verify_header(PAYLOAD, &header, SECRET, Some(DEFAULT_TOLERANCE)).is_ok());
    }

    #[test]
    fn test_verify_tolerance() {
        let old = chrono::Utc::now().timestamp() - 600;
        let header = generate_test_header(PAYLOAD, SECRET, Some(old)).unwrap();

        let error = verify_header(PAYLOAD, &header, SECRET, Some(DEFAULT_TOLERANCE)).unwrap_err();
        assert_eq!(error.to_string(), "Timestamp outside the tolerance zone");

        assert!(verify_header(PAYLOAD, &header, SECRET, None).is_ok());
        assert!(verify_header(PAYLOAD, &header, SECRET, Some(Duration::ZERO)).is_ok());
    }

    #[test]
    fn test_construct_event_parses_payload() {
        let header = generate_test_header(PAYLOAD, SECRET, None).unwrap();
        let event = construct_event(PAYLOAD, &header, SECRET).unwrap();
        assert_eq!(event["id"], "evt_test_webhook");
    }

    #[test]
    fn test_construct_event_rejects_invalid_json() {
        let header = generate_test_header("not json", SECRET, None).unwrap();
        let error = construct_event("not json", &header, SECRET).unwrap_err();
        assert!(matches!(error, ClarityboardError::Api(_)));
    }
}
