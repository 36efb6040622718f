/// Session token generation and validation
///
/// Session tokens are JWTs signed with HS256. The subject claim carries the
/// username and the expiry is a fixed 30 minutes from issuance. Tokens are
/// stateless: validation checks the signature and expiry only, so a token
/// cannot be invalidated before it expires.
///
/// # Example
///
/// ```
/// use toolscout_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "secret-key-at-least-32-bytes-long!!";
/// let token = create_token(&Claims::new("alice"), secret)?;
///
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fixed session token lifetime
pub const TOKEN_TTL_MINUTES: i64 = 30;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature invalid or payload malformed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Session token claims
///
/// - `sub`: username of the authenticated user
/// - `iss`: always "toolscout"
/// - `iat` / `exp` / `nbf`: Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username
    pub sub: String,

    /// Issuer - always "toolscout"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims expiring `TOKEN_TTL_MINUTES` from now
    pub fn new(username: &str) -> Self {
        Self::with_expiration(username, Duration::minutes(TOKEN_TTL_MINUTES))
    }

    /// Creates claims with a custom expiration (used in tests)
    pub fn with_expiration(username: &str, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: username.to_string(),
            iss: "toolscout".to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed session token from claims
///
/// The secret should be at least 32 bytes and comes from `JWT_SECRET`.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature, expiry, not-before time, and issuer. A token is
/// valid iff its signature matches and the current time is before `exp`.
///
/// # Errors
///
/// - `JwtError::Expired` if the expiry has passed
/// - `JwtError::ValidationError` for a bad signature or malformed payload
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&["toolscout"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("alice");

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "toolscout");
        assert!(!claims.is_expired());

        // Expiry sits 30 minutes out, give or take clock skew within the test
        let ttl = claims.exp - claims.iat;
        assert_eq!(ttl, TOKEN_TTL_MINUTES * 60);
    }

    #[test]
    fn test_create_and_validate_token() {
        let secret = "test-secret-key-at-least-32-bytes-long";

        let token = create_token(&Claims::new("alice"), secret).expect("Should create token");
        let validated = validate_token(&token, secret).expect("Should validate token");

        assert_eq!(validated.sub, "alice");
        assert_eq!(validated.iss, "toolscout");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_token(&Claims::new("alice"), "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret";

        // Negative duration = already expired
        let claims = Claims::with_expiration("alice", Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_malformed_token() {
        let result = validate_token("not.a.token", "secret");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));

        let result = validate_token("", "secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_token_preserves_username() {
        let secret = "another-test-secret-key-32-bytes!!";

        for username in ["alice", "bob_42", "user.name@host"] {
            let token = create_token(&Claims::new(username), secret).unwrap();
            let validated = validate_token(&token, secret).unwrap();
            assert_eq!(validated.sub, username);
        }
    }
}
