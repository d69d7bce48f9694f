//! HS256 JWT implementation of the token service.
//!
//! Tokens carry the username as `sub`, the stable user id as `uid`, and
//! expire thirty minutes after issue by default.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, TokenClaims, User};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// HS256-signed bearer tokens.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    /// Create a service signing with `secret` and the default lifetime.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    /// Create a service signing with `secret` and an explicit lifetime.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError> {
        let expires_at = Utc::now() + self.ttl;
        let claims = TokenClaims {
            sub: user.username().as_str().to_owned(),
            uid: *user.id(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| TokenError::issue(err.to_string()))?;
        Ok(AccessToken::bearer(token))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}
