//! User data model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was empty or not a valid UUID.
    InvalidId,
    /// Username was blank once trimmed.
    EmptyUsername,
    /// Username shorter than the minimum length.
    UsernameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Username longer than the maximum length.
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Username contains characters outside the allowed set.
    UsernameInvalidCharacters,
    /// Email address failed shape validation.
    InvalidEmail,
    /// Email address longer than the maximum length.
    EmailTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Display name longer than the maximum length.
    FullNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, dashes, or underscores",
            ),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmailTooLong { max } => {
                write!(f, "email address must be at most {max} characters")
            }
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() || raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;
/// Maximum allowed length for an email address.
///
/// Matches the `VARCHAR(254)` column, which itself follows RFC 5321's
/// deliverable-address bound.
pub const EMAIL_MAX: usize = 254;
/// Maximum allowed length for a display name, matching its column width.
pub const FULL_NAME_MAX: usize = 128;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this constrains allowed characters.
        Regex::new("^[A-Za-z0-9._-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is not the backend's concern.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login and lookup handle for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`]; the input is trimmed first.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = username.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&trimmed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the username as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`]; the input is trimmed first.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = email.into().trim().to_owned();
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Check a display name against the storage bound.
pub fn validate_full_name(full_name: &str) -> Result<(), UserValidationError> {
    if full_name.chars().count() > FULL_NAME_MAX {
        return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
    }
    Ok(())
}

/// Application user as exposed to clients.
///
/// The password hash is never part of this type; it travels separately
/// through the repository port and stays inside the persistence and
/// credential-verification adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, username: Username, email: EmailAddress, full_name: Option<String>) -> Self {
        Self {
            id,
            username,
            email,
            full_name,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login and lookup handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional display name.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    #[case("has spaces", UserValidationError::UsernameInvalidCharacters)]
    #[case("emoji🦀name", UserValidationError::UsernameInvalidCharacters)]
    fn invalid_usernames(#[case] input: &str, #[case] expected: UserValidationError) {
        let err = Username::new(input).expect_err("invalid username must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn username_longer_than_max_is_rejected() {
        let err = Username::new("x".repeat(USERNAME_MAX + 1)).expect_err("too long");
        assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
    }

    #[rstest]
    #[case("  alice  ", "alice")]
    #[case("bob.smith-2", "bob.smith-2")]
    fn valid_usernames_are_trimmed(#[case] input: &str, #[case] expected: &str) {
        let username = Username::new(input).expect("valid username");
        assert_eq!(username.as_str(), expected);
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("two@@signs.example")]
    #[case("user@nodot")]
    #[case("spaced user@example.com")]
    fn invalid_emails(#[case] input: &str) {
        assert_eq!(
            EmailAddress::new(input).expect_err("invalid email"),
            UserValidationError::InvalidEmail
        );
    }

    #[rstest]
    fn email_at_the_column_bound_is_accepted() {
        // "@example.com" is 12 characters.
        let local = "a".repeat(EMAIL_MAX - 12);
        let email = format!("{local}@example.com");
        assert_eq!(email.chars().count(), EMAIL_MAX);
        EmailAddress::new(email).expect("boundary-length email is valid");
    }

    #[rstest]
    fn email_over_the_column_bound_is_rejected() {
        let local = "a".repeat(EMAIL_MAX - 11);
        let email = format!("{local}@example.com");
        assert_eq!(email.chars().count(), EMAIL_MAX + 1);
        assert_eq!(
            EmailAddress::new(email).expect_err("over-long email"),
            UserValidationError::EmailTooLong { max: EMAIL_MAX }
        );
    }

    #[rstest]
    fn full_name_at_the_column_bound_is_accepted() {
        let name = "n".repeat(FULL_NAME_MAX);
        validate_full_name(&name).expect("boundary-length name is valid");
    }

    #[rstest]
    fn full_name_over_the_column_bound_is_rejected() {
        let name = "n".repeat(FULL_NAME_MAX + 1);
        assert_eq!(
            validate_full_name(&name).expect_err("over-long name"),
            UserValidationError::FullNameTooLong { max: FULL_NAME_MAX }
        );
    }

    #[rstest]
    fn user_id_rejects_non_uuid_input() {
        assert_eq!(
            UserId::new("not-a-uuid").expect_err("invalid id"),
            UserValidationError::InvalidId
        );
    }

    #[rstest]
    fn user_serialises_camel_case_without_hash() {
        let user = User::new(
            UserId::random(),
            Username::new("ada").expect("valid"),
            EmailAddress::new("ada@example.com").expect("valid"),
            Some("Ada Lovelace".to_owned()),
        );
        let value = serde_json::to_value(&user).expect("user serialises");
        assert_eq!(value["fullName"], "Ada Lovelace");
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
    }
}
