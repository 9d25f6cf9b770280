use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::{AuthError, ServiceError};
use crate::types::internal::auth::Claims;

/// Issues and validates the identity claims carried by requests
///
/// Tokens are HS256 JWTs whose subject is the user's email.
pub struct TokenService {
    jwt_secret: String,
    expiration_hours: i64,
}

impl TokenService {
    /// Create a new TokenService with the given signing secret and validity
    /// window in hours
    pub fn new(jwt_secret: String, expiration_hours: i64) -> Self {
        Self {
            jwt_secret,
            expiration_hours,
        }
    }

    /// Issue a token bound to the given email
    ///
    /// # Returns
    /// * `Ok(String)` - The encoded JWT
    /// * `Err(ServiceError)` - Signing failure
    pub fn issue(&self, email: &str) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let expiration = now + self.expiration_hours * 60 * 60;

        let claims = Claims {
            sub: email.to_string(),
            exp: expiration,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::crypto("issue_token", e.to_string()))
    }

    /// Validate a token and return its claims
    ///
    /// # Returns
    /// * `Ok(Claims)` - The decoded claims
    /// * `Err(ServiceError)` - `ExpiredToken` or `InvalidToken`
    pub fn validate(&self, token: &str) -> Result<Claims, ServiceError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                ServiceError::Auth(AuthError::ExpiredToken)
            } else {
                ServiceError::Auth(AuthError::InvalidToken)
            }
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new("test-secret-key-minimum-32-characters-long".to_string(), 24)
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = test_service();

        let token = service.issue("a@x.com").expect("Failed to issue token");
        let claims = service.validate(&token).expect("Failed to validate token");

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_validate_rejects_garbage_token() {
        let service = test_service();

        let result = service.validate("not-a-jwt");

        match result {
            Err(ServiceError::Auth(AuthError::InvalidToken)) => {}
            other => panic!("Expected InvalidToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        let service = test_service();

        let now = Utc::now().timestamp();
        let expired_claims = Claims {
            sub: "a@x.com".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let expired_token = encode(
            &Header::new(Algorithm::HS256),
            &expired_claims,
            &EncodingKey::from_secret("test-secret-key-minimum-32-characters-long".as_bytes()),
        )
        .unwrap();

        let result = service.validate(&expired_token);

        match result {
            Err(ServiceError::Auth(AuthError::ExpiredToken)) => {}
            other => panic!("Expected ExpiredToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_validate_rejects_token_signed_with_other_secret() {
        let service = test_service();
        let other = TokenService::new("another-secret-key-also-32-chars-xx".to_string(), 24);

        let token = other.issue("a@x.com").unwrap();
        let result = service.validate(&token);

        match result {
            Err(ServiceError::Auth(AuthError::InvalidToken)) => {}
            other => panic!("Expected InvalidToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_debug_does_not_expose_secret() {
        let service = test_service();

        let output = format!("{:?}", service);

        assert!(output.contains("<redacted>"));
        assert!(!output.contains("test-secret-key"));
    }
}
