//! Session credential issue and verification (HS256).

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::SessionError;
use crate::models::session::SessionClaims;
use crate::models::user::Identity;

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Issues and verifies admin session credentials with a shared secret.
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Codec with the default 7-day lifetime.
    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::days(DEFAULT_SESSION_TTL_DAYS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a credential for `identity`, valid from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, SessionError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a credential for `identity` as if issued at `now`.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = SessionClaims::for_identity(
            identity,
            now.timestamp(),
            (now + self.ttl).timestamp(),
        );
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Encode(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::Expired,
                ErrorKind::InvalidSignature => SessionError::InvalidSignature,
                _ => SessionError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn admin() -> Identity {
        Identity {
            id: "uid-admin".into(),
            email: "admin@moodyme.app".into(),
            first_name: "Ada".into(),
            last_name: "Min".into(),
            is_active: true,
            email_verified: true,
            role: Role::Admin,
            created_at: None,
        }
    }

    #[test]
    fn issue_then_verify_returns_claims() {
        let codec = SessionCodec::with_default_ttl(b"test-secret");
        let now = Utc::now();
        let token = codec.issue_at(&admin(), now).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.user_id, "uid-admin");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert_eq!(claims.iat, now.timestamp());
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let token = SessionCodec::with_default_ttl(b"secret-a")
            .issue(&admin())
            .unwrap();
        let err = SessionCodec::with_default_ttl(b"secret-b")
            .verify(&token)
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidSignature);
    }

    #[test]
    fn expired_credential_is_rejected() {
        let codec = SessionCodec::with_default_ttl(b"test-secret");
        let issued = Utc::now() - Duration::days(8);
        let token = codec.issue_at(&admin(), issued).unwrap();
        assert_eq!(codec.verify(&token).unwrap_err(), SessionError::Expired);
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = SessionCodec::with_default_ttl(b"test-secret");
        assert!(matches!(
            codec.verify("not-a-token"),
            Err(SessionError::Malformed(_))
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = SessionCodec::with_default_ttl(b"test-secret");
        let token = codec.issue(&admin()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = codec
            .issue(&Identity {
                id: "uid-other".into(),
                ..admin()
            })
            .unwrap();
        let other_payload = other.split('.').nth(1).unwrap().to_string();
        parts[1] = &other_payload;
        let forged = parts.join(".");
        assert!(codec.verify(&forged).is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let codec = SessionCodec::with_default_ttl(b"super-secret-value");
        assert!(!format!("{codec:?}").contains("super-secret-value"));
    }
}
