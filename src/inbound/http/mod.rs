//! HTTP inbound adapter exposing REST endpoints.

pub mod bearer;
pub mod corpus;
pub mod documents;
pub mod error;
pub mod health;
pub mod query;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token;
pub mod users;

pub use error::ApiResult;
