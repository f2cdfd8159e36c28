//! Access-token issuance and validation.
//!
//! Tokens are HS256-signed JWTs carrying the user id and role. The lifetime
//! is a fixed hour from issuance and is not configurable; only the signing
//! secret comes from the environment.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use taskhub_core::types::DbId;

/// Fixed access-token lifetime in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Claims carried by every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's internal database id.
    pub sub: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
}

/// Signing configuration shared by issuance and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    /// Read the signing secret from `JWT_SECRET`.
    ///
    /// # Panics
    ///
    /// Panics when the variable is unset or empty. There is no safe default
    /// for a signing secret.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Issue a signed token for the given user, valid for [`TOKEN_TTL_SECS`].
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the [`Claims`] on success.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let config = test_config();
        let token = generate_access_token(42, "admin", &config).expect("issuance should succeed");

        let claims = validate_token(&token, &config).expect("validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Expired well past the default 60-second validation leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "user".to_string(),
            exp: now - 300,
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = generate_access_token(
            1,
            "user",
            &JwtConfig {
                secret: "secret-alpha".to_string(),
            },
        )
        .expect("issuance should succeed");

        let other = JwtConfig {
            secret: "secret-bravo".to_string(),
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn test_garbage_token_fails() {
        assert!(validate_token("not-a-jwt", &test_config()).is_err());
    }
}
