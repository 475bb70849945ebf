//! Request signing for the Imbo authentication scheme.
//!
//! Imbo authenticates state-changing requests with an HMAC-SHA256 signature
//! computed over `METHOD|url|publicKey|timestamp` using the user's private
//! key. The signature and the timestamp travel as query parameters, and the
//! server recomputes the digest over the URL exactly as transmitted. The
//! timestamp is therefore percent-encoded *before* it enters the canonical
//! string, so both sides hash identical bytes.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Borrowed inputs for one signature computation.
pub(crate) struct SigningInput<'a> {
    /// HTTP method, uppercase.
    pub method: &'a str,
    /// Full URL of the request, including any query string, without the
    /// `signature` and `timestamp` parameters.
    pub url: &'a str,
    /// Public key of the user issuing the request.
    pub public_key: &'a str,
    /// Timestamp already percent-encoded for the query string.
    pub timestamp: &'a str,
}

/// Format `now` as `YYYY-MM-DDTHH:MM:SSZ` with the colons percent-encoded.
pub(crate) fn encode_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
        .replace(':', "%3A")
}

fn canonical_string(input: &SigningInput<'_>) -> String {
    format!(
        "{}|{}|{}|{}",
        input.method, input.url, input.public_key, input.timestamp
    )
}

/// Lowercase hex HMAC-SHA256 digest of the canonical string under `private_key`.
pub(crate) fn sign(input: &SigningInput<'_>, private_key: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(private_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(canonical_string(input).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PRIVATE_KEY: &str = "8495c97ea3a313c12c0661dc5526e769";

    fn input<'a>(method: &'a str, url: &'a str) -> SigningInput<'a> {
        SigningInput {
            method,
            url,
            public_key: "key",
            timestamp: "2026-02-18T14%3A30%3A00Z",
        }
    }

    #[test]
    fn test_encode_timestamp() {
        let when = Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap();
        assert_eq!(encode_timestamp(when), "2026-02-18T14%3A30%3A00Z");
    }

    #[test]
    fn test_encode_timestamp_pads_fields() {
        let when = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(encode_timestamp(when), "2026-01-02T03%3A04%3A05Z");
    }

    #[test]
    fn test_canonical_string_layout() {
        let input = input("PUT", "http://host/users/key/images.json");
        assert_eq!(
            canonical_string(&input),
            "PUT|http://host/users/key/images.json|key|2026-02-18T14%3A30%3A00Z"
        );
    }

    #[test]
    fn test_sign_known_digests() {
        let image = "http://host/users/key/images/23d7f91b25f3013fcc75ce070c40e004.json";
        let metadata = "http://host/users/key/images/23d7f91b25f3013fcc75ce070c40e004/metadata.json";

        assert_eq!(
            sign(&input("DELETE", image), PRIVATE_KEY),
            "bea9033d91331d13073d431a97bbc3e5ab10794b5a25901bf31b30c7faae0617"
        );
        assert_eq!(
            sign(&input("PUT", image), PRIVATE_KEY),
            "800df30c73dc5dc3e9ef2accbee5d6f49542c67e4789e80a8e5cc0fc7f9554a1"
        );
        assert_eq!(
            sign(&input("POST", metadata), PRIVATE_KEY),
            "05030745025f43dcb4c23723bb1a75f5f942797496ada9a1f9dd30f61c42c8cf"
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let input = input("DELETE", "http://host/users/key/images/abc.json");
        assert_eq!(sign(&input, PRIVATE_KEY), sign(&input, PRIVATE_KEY));
    }

    #[test]
    fn test_sign_depends_on_every_field() {
        let url = "http://host/users/key/images/abc.json";
        let base = sign(&input("PUT", url), PRIVATE_KEY);

        assert_ne!(sign(&input("DELETE", url), PRIVATE_KEY), base);
        assert_ne!(
            sign(&input("PUT", "http://host/users/key/images/abd.json"), PRIVATE_KEY),
            base
        );
        assert_ne!(sign(&input("PUT", url), "another-private-key"), base);

        let mut other = input("PUT", url);
        other.timestamp = "2026-02-18T14%3A30%3A01Z";
        assert_ne!(sign(&other, PRIVATE_KEY), base);
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let digest = sign(&input("GET", "http://host/status.json"), PRIVATE_KEY);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
