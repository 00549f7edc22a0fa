//! Stateless auth tokens: HMAC-SHA256 JWTs carrying the user id.

use anyhow::anyhow;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;
use uuid::Uuid;

const ISSUER: &str = "clienttrack";

/// How long a signed-in session stays valid.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// The server's signing key, shared by every handler through the app state.
#[derive(Clone)]
pub struct JwtKeys {
    key: Hmac<Sha256>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let key = Hmac::new_from_slice(secret.as_bytes())
            .map_err(|_| anyhow!("invalid token secret"))?;
        Ok(Self { key })
    }
}

/// The verified contents of a bearer token.
pub struct AuthToken {
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn issue(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            issued_at: now,
            expires_at: now + Duration::days(TOKEN_TTL_DAYS),
        }
    }

    pub fn sign(&self, keys: &JwtKeys) -> Option<String> {
        let claims = Claims {
            registered: RegisteredClaims {
                issuer: Some(ISSUER.into()),
                subject: Some(self.user_id.to_string()),
                audience: None,
                expiration: Some(self.expires_at.timestamp() as u64),
                not_before: None,
                issued_at: Some(self.issued_at.timestamp() as u64),
                json_web_token_id: None,
            },
            private: Default::default(),
        };

        claims.sign_with_key(&keys.key).ok()
    }

    /// Verify the signature, issuer and validity window. Returns None for
    /// anything that should read as "not logged in".
    pub fn verify(keys: &JwtKeys, token: &str) -> Option<Self> {
        let token: Token<Header, Claims, _> = token.verify_with_key(&keys.key).ok()?;
        let claims = token.claims();

        if claims.registered.issuer.as_deref() != Some(ISSUER) {
            return None;
        }

        let issued_at = Utc
            .timestamp_opt(claims.registered.issued_at? as i64, 0)
            .single()?;
        if issued_at > Utc::now() {
            return None;
        }

        let expires_at = Utc
            .timestamp_opt(claims.registered.expiration? as i64, 0)
            .single()?;
        if expires_at < Utc::now() {
            return None;
        }

        let user_id = claims
            .registered
            .subject
            .as_ref()
            .and_then(|s| Uuid::parse_str(s).ok())?;

        Some(Self {
            user_id,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_round_trip() {
        let keys = JwtKeys::new("secret").unwrap();
        let user_id = Uuid::new_v4();

        let token = AuthToken::issue(user_id, Utc::now()).sign(&keys).unwrap();
        let verified = AuthToken::verify(&keys, &token).unwrap();
        assert_eq!(verified.user_id, user_id);
    }

    #[test]
    fn rejects_wrong_key_and_garbage() {
        let keys = JwtKeys::new("secret").unwrap();
        let other = JwtKeys::new("other-secret").unwrap();

        let token = AuthToken::issue(Uuid::new_v4(), Utc::now())
            .sign(&keys)
            .unwrap();
        assert!(AuthToken::verify(&other, &token).is_none());
        assert!(AuthToken::verify(&keys, "not-a-token").is_none());
    }

    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::new("secret").unwrap();
        let stale = Utc::now() - Duration::days(TOKEN_TTL_DAYS + 1);

        let token = AuthToken::issue(Uuid::new_v4(), stale).sign(&keys).unwrap();
        assert!(AuthToken::verify(&keys, &token).is_none());
    }
}
