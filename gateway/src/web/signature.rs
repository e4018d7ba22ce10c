//! GitHub webhook signature verification.
//!
//! GitHub signs webhook requests using HMAC-SHA256 over the raw request body
//! and sends the result in the `X-Hub-Signature-256` header as
//! `sha256=<lowercase hex digest>`.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Expected prefix of the signature header.
const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a GitHub webhook signature.
///
/// Must be called with the *unparsed* request body bytes: re-serializing a
/// parsed payload can produce different bytes than the ones GitHub signed.
///
/// # Arguments
///
/// * `payload` - The raw request body, exactly as received
/// * `signature_header` - The `X-Hub-Signature-256` header value
/// * `secret` - The shared webhook secret configured on the GitHub side
///
/// # Returns
///
/// `true` if the signature matches, `false` otherwise. Never panics: a
/// missing, empty, or malformed header is treated as an invalid signature.
pub fn verify_github_signature(payload: &[u8], signature_header: &str, secret: &str) -> bool {
    if signature_header.is_empty() || !signature_header.starts_with(SIGNATURE_PREFIX) {
        warn!(
            has_header = !signature_header.is_empty(),
            "github_signature_malformed_header"
        );
        return false;
    }

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("github_signature_invalid_key");
            return false;
        }
    };

    mac.update(payload);

    let expected = format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()));

    // Constant-time comparison to prevent timing attacks
    let valid = constant_time_compare(&expected, signature_header);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature_header.len(),
            "github_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sign a payload the way GitHub does.
    fn sign(payload: &[u8], secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_verify_signature_valid() {
        let payload = br#"{"action":"opened"}"#;
        let secret = "test-webhook-secret";
        let header = sign(payload, secret);

        assert!(verify_github_signature(payload, &header, secret));
    }

    #[test]
    fn test_verify_signature_tampered_payload() {
        let payload = br#"{"action":"opened"}"#;
        let secret = "test-webhook-secret";
        let header = sign(payload, secret);

        let mut tampered = payload.to_vec();
        tampered[0] ^= 0x01;
        assert!(!verify_github_signature(&tampered, &header, secret));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let payload = br#"{"action":"opened"}"#;
        let header = sign(payload, "correct-secret");

        assert!(!verify_github_signature(payload, &header, "wrong-secret"));
    }

    #[test]
    fn test_verify_signature_empty_header() {
        assert!(!verify_github_signature(b"payload", "", "secret"));
    }

    #[test]
    fn test_verify_signature_missing_prefix() {
        // A bare hex digest without the sha256= prefix is rejected
        let payload = b"payload";
        let header = sign(payload, "secret");
        let bare = header.strip_prefix("sha256=").unwrap();

        assert!(!verify_github_signature(payload, bare, "secret"));
    }

    #[test]
    fn test_verify_signature_wrong_digest() {
        // Well-formed header, wrong digest
        let header = format!("sha256={}", "ab".repeat(32));
        assert!(!verify_github_signature(b"payload", &header, "secret"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
