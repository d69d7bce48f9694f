//! Credential handling adapters: hashing, signing, and login.

pub mod jwt;
pub mod login;
pub mod password;

pub use jwt::JwtTokenService;
pub use login::CredentialLoginService;
pub use password::Argon2PasswordHasher;
