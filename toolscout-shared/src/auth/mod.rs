/// Authentication primitives for ToolScout
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed, time-bound session tokens (HS256, 30 minute TTL)
///
/// Tokens are stateless: there is no revocation list, so a token stays valid
/// until its expiry.
///
/// # Example
///
/// ```no_run
/// use toolscout_shared::auth::password::{hash_password, verify_password};
/// use toolscout_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new("alice");
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(validated.sub, "alice");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
