//! Payment webhook HMAC verification.
//!
//! The payment provider signs the raw request body with HMAC-SHA256. The
//! signature header has been seen in three shapes: a bare hex digest, a bare
//! base64 digest, and a `t=...,v1=...` list. All three are accepted.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Keys in a `k=v` signature list that carry the digest.
const SIGNATURE_KEYS: [&str; 2] = ["v1", "sig"];

/// Compute the hex HMAC-SHA256 of `payload` under `secret`.
pub fn compute_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Check `header` against the HMAC of `payload`.
///
/// Comparison runs in constant time via [`Mac::verify_slice`]. Malformed
/// headers simply fail verification.
pub fn verify_webhook_signature(payload: &[u8], header: &str, secret: &str) -> bool {
    let header = header.trim();
    if header.is_empty() || secret.is_empty() {
        return false;
    }

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);

    if digest_matches(&mac, header) {
        return true;
    }

    signature_from_list(header).is_some_and(|candidate| digest_matches(&mac, candidate))
}

/// Pull the digest out of a `t=...,v1=...` style header.
fn signature_from_list(header: &str) -> Option<&str> {
    let pairs: Vec<(&str, &str)> = header
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.split_once('='))
        .filter(|(key, _)| !key.is_empty())
        .collect();

    SIGNATURE_KEYS.iter().find_map(|wanted| {
        pairs
            .iter()
            .find(|(key, value)| key == wanted && !value.is_empty())
            .map(|(_, value)| *value)
    })
}

/// Decode `candidate` as hex or base64 and verify it against `mac`.
fn digest_matches(mac: &HmacSha256, candidate: &str) -> bool {
    if let Ok(bytes) = hex::decode(candidate) {
        if mac.clone().verify_slice(&bytes).is_ok() {
            return true;
        }
    }
    match BASE64.decode(candidate) {
        Ok(bytes) => mac.clone().verify_slice(&bytes).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const PAYLOAD: &[u8] = br#"{"eventType":"checkout.completed"}"#;

    fn base64_signature() -> String {
        let bytes = hex::decode(compute_signature(SECRET, PAYLOAD)).unwrap();
        BASE64.encode(bytes)
    }

    #[test]
    fn signature_is_hex_sha256() {
        let sig = compute_signature(SECRET, PAYLOAD);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn accepts_raw_hex() {
        let sig = compute_signature(SECRET, PAYLOAD);
        assert!(verify_webhook_signature(PAYLOAD, &sig, SECRET));
        assert!(verify_webhook_signature(PAYLOAD, &format!("  {sig}\n"), SECRET));
    }

    #[test]
    fn accepts_raw_base64() {
        assert!(verify_webhook_signature(PAYLOAD, &base64_signature(), SECRET));
    }

    #[test]
    fn accepts_key_value_list() {
        let sig = compute_signature(SECRET, PAYLOAD);
        let header = format!("t=1700000000,v1={sig}");
        assert!(verify_webhook_signature(PAYLOAD, &header, SECRET));

        let header = format!("t=1700000000; sig={}", base64_signature());
        assert!(verify_webhook_signature(PAYLOAD, &header, SECRET));
    }

    #[test]
    fn rejects_wrong_secret() {
        let sig = compute_signature("other", PAYLOAD);
        assert!(!verify_webhook_signature(PAYLOAD, &sig, SECRET));
    }

    #[test]
    fn rejects_tampered_payload() {
        let sig = compute_signature(SECRET, PAYLOAD);
        assert!(!verify_webhook_signature(b"{}", &sig, SECRET));
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(!verify_webhook_signature(PAYLOAD, "", SECRET));
        assert!(!verify_webhook_signature(PAYLOAD, "not-a-signature", SECRET));
        assert!(!verify_webhook_signature(PAYLOAD, "t=1,v1=", SECRET));
        let sig = compute_signature(SECRET, PAYLOAD);
        assert!(!verify_webhook_signature(PAYLOAD, &sig, ""));
    }
}
