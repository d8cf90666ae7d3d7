use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: i32,
    /// Issue timestamp, seconds since epoch.
    pub iat: usize,
    /// Expiration timestamp, seconds since epoch.
    pub exp: usize,
}

/// Signing and verification keys for bearer tokens, built once from the
/// server secret at startup and shared through `web::Data`. Stateless:
/// token validity is proven by the signature and expiry alone, so there is
/// nothing to store or revoke server-side.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::days(ttl_days),
        }
    }

    /// Issues a signed token for the given user id, expiring after the
    /// configured lifetime (7 days by default).
    pub fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token's signature and expiry and decodes its claims.
    /// Any failure mode maps to `AppError::InvalidToken`.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> TokenKeys {
        TokenKeys::new("unit-test-secret", 7)
    }

    #[test_log::test]
    fn test_issue_and_validate_round_trip() {
        let keys = test_keys();
        let token = keys.issue(123).unwrap();
        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.sub, 123);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = test_keys();

        // Encode claims that expired two hours ago with the same secret,
        // well past the default 60s validation leeway.
        let now = chrono::Utc::now();
        let expired = Claims {
            sub: 2,
            iat: (now - chrono::Duration::hours(3)).timestamp() as usize,
            exp: (now - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret("unit-test-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            keys.validate(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let keys = test_keys();
        let other = TokenKeys::new("a-completely-different-secret", 7);

        let token = other.issue(3).unwrap();
        assert!(matches!(
            keys.validate(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let keys = test_keys();
        assert!(matches!(
            keys.validate("not-a-jwt"),
            Err(AppError::InvalidToken)
        ));
    }
}
