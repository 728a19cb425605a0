//! Session token issuance.
//!
//! The login handler sees the [`SessionSigner`] trait; the production
//! implementation signs HS256 JWTs over the configured secret.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Claims carried by a portal session token: the authenticated username plus
/// the standard issued-at/expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginClaims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl LoginClaims {
    pub fn new(username: String, validity_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            username,
            iat: now,
            exp: now + validity_secs,
        }
    }
}

/// Failure while signing or decoding a session token.
#[derive(Debug)]
pub struct SignError {
    message: String,
}

impl SignError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SignError {}

/// The signing collaborator, as consumed by the login flow.
pub trait SessionSigner: Send + Sync {
    /// Mint a session token bound to `username`.
    fn sign(&self, username: &str) -> Result<String, SignError>;
}

pub type DynSessionSigner = Arc<dyn SessionSigner>;

/// HS256 signer over the configured secret.
pub struct JwtSessionSigner {
    secret: String,
    validity_secs: i64,
}

impl JwtSessionSigner {
    pub fn new(secret: String, validity_hours: i64) -> Self {
        Self {
            secret,
            validity_secs: validity_hours * 3600,
        }
    }
}

impl SessionSigner for JwtSessionSigner {
    fn sign(&self, username: &str) -> Result<String, SignError> {
        let claims = LoginClaims::new(username.to_string(), self.validity_secs);
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|err| SignError::new(err.to_string()))
    }
}

/// Decode and validate a session token issued by [`JwtSessionSigner`].
pub fn decode_session_token(token: &str, secret: &str) -> Result<LoginClaims, SignError> {
    decode::<LoginClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|err| SignError::new(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_decode_roundtrips_the_username() {
        let signer = JwtSessionSigner::new("test_secret".to_string(), 720);
        let token = signer.sign("octocat").expect("sign");

        let claims = decode_session_token(&token, "test_secret").expect("decode");
        assert_eq!(claims.username, "octocat");
        assert_eq!(claims.exp - claims.iat, 720 * 3600);
    }

    #[test]
    fn decoding_rejects_a_foreign_secret() {
        let signer = JwtSessionSigner::new("test_secret".to_string(), 720);
        let token = signer.sign("octocat").expect("sign");

        assert!(decode_session_token(&token, "other_secret").is_err());
    }

    #[test]
    fn decoding_rejects_an_expired_token() {
        // Negative validity places exp in the past.
        let signer = JwtSessionSigner::new("test_secret".to_string(), -1);
        let token = signer.sign("octocat").expect("sign");

        assert!(decode_session_token(&token, "test_secret").is_err());
    }
}
