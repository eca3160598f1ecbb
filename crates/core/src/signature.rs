//! Webhook signature computation and verification.
//!
//! The platform signs every webhook request body with HMAC-SHA256 keyed by
//! the channel secret and sends the base64-encoded digest in the
//! `X-Line-Signature` header. Verification must happen on the exact wire
//! bytes of the body, never on a re-serialized copy.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the base64-encoded HMAC-SHA256 signature for a request body.
///
/// This is what the platform sends in the signature header; exposed so
/// tests and local tooling can produce valid requests.
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify a received signature against the raw request body.
///
/// Returns `false` on an empty secret (never "skip verification"), on a
/// signature that is not valid base64, and on a digest mismatch. The digest
/// comparison is constant-time via [`Mac::verify_slice`].
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    if secret.is_empty() {
        return false;
    }

    let Ok(received) = STANDARD.decode(signature) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&received).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
