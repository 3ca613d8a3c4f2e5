//! Webhook signature verification.
//!
//! Stripe signs `"{timestamp}.{raw_body}"` with HMAC-SHA256 and sends
//! `t=<ts>,v1=<hex>` in the `Stripe-Signature` header. Verification must run
//! over the exact raw body bytes — any re-serialization breaks it.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Maximum accepted age of a signed payload, in seconds.
pub const TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("malformed signature header")]
    MalformedHeader,

    #[error("invalid timestamp")]
    InvalidTimestamp,

    #[error("timestamp outside tolerance window")]
    StaleTimestamp,

    #[error("signature mismatch")]
    Mismatch,
}

/// Parses a `t=timestamp,v1=signature` header into its parts.
pub fn parse_signature_header(header: &str) -> Result<(i64, String), SignatureError> {
    let mut timestamp = None;
    let mut v1_signature = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value.to_string()),
            Some(("v1", value)) => v1_signature = Some(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    let v1_signature = v1_signature.ok_or(SignatureError::MalformedHeader)?;

    let timestamp = timestamp
        .parse::<i64>()
        .map_err(|_| SignatureError::InvalidTimestamp)?;

    Ok((timestamp, v1_signature))
}

/// Verifies a webhook signature over the raw payload bytes.
/// Constant-time comparison; `now` is injected for testability.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let (timestamp, v1_signature) = parse_signature_header(header)?;

    if (now - timestamp).abs() > TOLERANCE_SECS {
        return Err(SignatureError::StaleTimestamp);
    }

    let expected = hex::encode(compute_signature(payload, timestamp, secret));

    if expected.as_bytes().ct_eq(v1_signature.as_bytes()).into() {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

fn compute_signature(payload: &[u8], timestamp: i64, secret: &str) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac.finalize().into_bytes().into()
}
