//! Signing purchase link payloads into compact tokens.

use std::fmt;

use jwt_simple::prelude::{Claims, Duration, HS256Key, MACLike};
use tollgate_common::PurchaseLinkPayload;

use crate::errors::SigningError;

/// Turns a [`PurchaseLinkPayload`] into the compact token embedded in a purchase URL.
///
/// The default implementation is [`Hs256Signer`]. Supply your own with
/// [`TollgateClientBuilder::signer`](crate::TollgateClientBuilder::signer), for
/// example to keep the secret in a key-management service.
pub trait TokenSigner: fmt::Debug + Send + Sync {
    /// Sign `payload`.
    fn sign(&self, payload: &PurchaseLinkPayload) -> Result<String, SigningError>;
}

/// Shortest signing secret [`Hs256Signer`] accepts, in bytes (96 bits).
pub const MIN_SECRET_LEN: usize = 12;

/// HMAC-SHA256 JWT signer keyed with the publication's signing secret.
///
/// The token's claims are the payload fields plus `iat`, and `exp` when
/// [`Self::valid_for`] is set.
#[derive(Clone)]
pub struct Hs256Signer {
    key: HS256Key,
    valid_for: Option<std::time::Duration>,
}

impl Hs256Signer {
    /// Signer for the given shared secret.
    ///
    /// Fails with [`SigningError::WeakSecret`] for secrets shorter than
    /// [`MIN_SECRET_LEN`] bytes, which could never sign a token.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, SigningError> {
        let secret = secret.as_ref();
        if secret.len() < MIN_SECRET_LEN {
            return Err(SigningError::WeakSecret {
                min_len: MIN_SECRET_LEN,
            });
        }

        Ok(Self {
            key: HS256Key::from_bytes(secret),
            valid_for: None,
        })
    }

    /// Make tokens expire `valid_for` after they are issued.
    #[must_use]
    pub fn valid_for(mut self, valid_for: std::time::Duration) -> Self {
        self.valid_for = Some(valid_for);
        self
    }

    /// Check a token signed with the same secret and return its payload.
    pub fn verify(&self, token: &str) -> Result<PurchaseLinkPayload, SigningError> {
        self.key
            .verify_token::<PurchaseLinkPayload>(token, None)
            .map(|claims| claims.custom)
            .map_err(|err| SigningError::Verify(err.to_string()))
    }
}

impl fmt::Debug for Hs256Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hs256Signer")
            .field("key", &"<redacted>")
            .field("valid_for", &self.valid_for)
            .finish()
    }
}

impl TokenSigner for Hs256Signer {
    fn sign(&self, payload: &PurchaseLinkPayload) -> Result<String, SigningError> {
        let valid_for = self.valid_for.map_or(0, |d| d.as_secs());
        let mut claims = Claims::with_custom_claims(payload.clone(), Duration::from_secs(valid_for));
        claims.invalid_before = None;
        if self.valid_for.is_none() {
            claims.expires_at = None;
        }

        self.key
            .authenticate(claims)
            .map_err(|err| SigningError::Sign(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tollgate_common::{PricingInput, build_payload};

    use super::*;

    #[test]
    fn sign_verify() {
        let signer = Hs256Signer::new("publication-secret").unwrap();
        let payload = build_payload(
            "https://example.com/a",
            Some(PricingInput::new(49.0).discount(10.0, 5.0)),
            true,
        )
        .unwrap();

        let token = signer.sign(&payload).unwrap();
        assert_eq!(token.split('.').count(), 3);

        assert_eq!(signer.verify(&token).unwrap(), payload);
    }

    #[test]
    fn claims_are_the_payload_plus_issued_at() {
        let signer = Hs256Signer::new("publication-secret").unwrap();
        let payload = build_payload("https://example.com/a", None, false).unwrap();

        let token = signer.sign(&payload).unwrap();
        let claims = signer
            .key
            .verify_token::<serde_json::Value>(&token, None)
            .unwrap();

        assert!(claims.issued_at.is_some());
        assert!(claims.expires_at.is_none());
        assert_eq!(claims.custom, json!({ "permalink": "https://example.com/a" }));
    }

    #[test]
    fn expiry_is_opt_in() {
        let signer = Hs256Signer::new("publication-secret")
            .unwrap()
            .valid_for(std::time::Duration::from_secs(600));
        let payload = build_payload("https://example.com/a", None, false).unwrap();

        let token = signer.sign(&payload).unwrap();
        let claims = signer
            .key
            .verify_token::<serde_json::Value>(&token, None)
            .unwrap();
        assert!(claims.expires_at.is_some());
    }

    #[test]
    fn wrong_secret_fails() {
        let payload = build_payload("https://example.com/a", None, false).unwrap();
        let token = Hs256Signer::new("first-publication-secret")
            .unwrap()
            .sign(&payload)
            .unwrap();

        assert!(matches!(
            Hs256Signer::new("other-publication-secret")
                .unwrap()
                .verify(&token),
            Err(SigningError::Verify(_))
        ));
    }

    #[test]
    fn short_secrets_are_rejected() {
        for secret in ["", "short", "elevenbytes"] {
            assert!(matches!(
                Hs256Signer::new(secret),
                Err(SigningError::WeakSecret { min_len: 12 })
            ));
        }

        let signer = Hs256Signer::new("twelve-bytes").unwrap();
        let payload = build_payload("https://example.com/a", None, false).unwrap();
        assert!(signer.sign(&payload).is_ok());
    }

    #[test]
    fn debug_hides_key() {
        let rendered = format!("{:?}", Hs256Signer::new("publication-secret").unwrap());
        assert!(!rendered.contains("publication-secret"));
    }
}
