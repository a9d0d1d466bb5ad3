//! Webhook signature verification
//!
//! The platform signs every delivery with HMAC-SHA256 over the raw request
//! body using the shared channel secret, and sends the base64 digest in a
//! header. Verification must run against the untouched bytes, captured
//! before any body parsing.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use mediadesk_core::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Compute the base64 HMAC-SHA256 signature for a payload.
pub fn sign_payload(raw_body: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(raw_body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify a claimed webhook signature against the raw body bytes.
///
/// Missing signature, empty body, or empty secret fail with
/// `Authentication`; a digest mismatch fails with `InvalidSignature`.
/// Succeeds with no side effects.
pub fn verify_signature(
    raw_body: &[u8],
    secret: &str,
    claimed: Option<&str>,
) -> Result<(), AppError> {
    let claimed = match claimed {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(AppError::Authentication(
                "Missing signature header".to_string(),
            ))
        }
    };
    if raw_body.is_empty() {
        return Err(AppError::Authentication("Missing request body".to_string()));
    }
    if secret.is_empty() {
        return Err(AppError::Authentication(
            "Channel secret not configured".to_string(),
        ));
    }

    let expected = sign_payload(raw_body, secret);

    // Constant-time comparison to prevent timing attacks
    use subtle::ConstantTimeEq;
    if expected.as_bytes().ct_eq(claimed.as_bytes()).into() {
        Ok(())
    } else {
        Err(AppError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signature_passes() {
        let body = br#"{"events":[]}"#;
        let signature = sign_payload(body, "channel-secret");
        assert!(verify_signature(body, "channel-secret", Some(&signature)).is_ok());
    }

    #[test]
    fn test_mutated_body_fails() {
        let body = br#"{"events":[]}"#;
        let signature = sign_payload(body, "channel-secret");

        let mut mutated = body.to_vec();
        mutated[0] ^= 0x01;
        let result = verify_signature(&mutated, "channel-secret", Some(&signature));
        assert!(matches!(result, Err(AppError::InvalidSignature)));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let body = b"payload";
        let signature = sign_payload(body, "channel-secret");
        let result = verify_signature(body, "other-secret", Some(&signature));
        assert!(matches!(result, Err(AppError::InvalidSignature)));
    }

    #[test]
    fn test_missing_inputs_fail_with_authentication() {
        let body = b"payload";
        let signature = sign_payload(body, "secret");

        assert!(matches!(
            verify_signature(body, "secret", None),
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            verify_signature(body, "secret", Some("")),
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            verify_signature(b"", "secret", Some(&signature)),
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            verify_signature(body, "", Some(&signature)),
            Err(AppError::Authentication(_))
        ));
    }
}
