//! Authentication primitives: login credentials, issued tokens, and claims.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::{UserId, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Clone)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Bearer token issued by `POST /token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct AccessToken {
    access_token: String,
    token_type: String,
}

impl AccessToken {
    /// Wrap an encoded JWT as a bearer token response.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_owned(),
        }
    }

    /// Encoded token value.
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Token type; always `bearer`.
    pub fn token_type(&self) -> &str {
        self.token_type.as_str()
    }
}

/// Claims carried by an issued token.
///
/// `sub` is the username (matching the original token contract) and `uid`
/// pins the stable user identifier so per-user endpoints can authorise
/// without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the authenticated username.
    pub sub: String,
    /// Stable user identifier.
    pub uid: UserId,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

impl TokenClaims {
    /// Whether these claims authorise access to `user_id`'s resources.
    pub fn authorises(&self, user_id: &UserId) -> bool {
        &self.uid == user_id
    }

    /// Parse the subject back into a validated [`Username`].
    pub fn username(&self) -> Result<Username, super::UserValidationError> {
        Username::new(self.sub.as_str())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn access_token_serialises_snake_case() {
        let token = AccessToken::bearer("abc.def.ghi");
        let value = serde_json::to_value(&token).expect("token serialises");
        assert_eq!(value["access_token"], "abc.def.ghi");
        assert_eq!(value["token_type"], "bearer");
    }

    #[rstest]
    fn claims_authorise_only_their_own_user() {
        let uid = UserId::random();
        let other = UserId::random();
        let claims = TokenClaims {
            sub: "ada".to_owned(),
            uid,
            exp: 0,
        };
        assert!(claims.authorises(&uid));
        assert!(!claims.authorises(&other));
    }
}
