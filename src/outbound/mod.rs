//! Outbound (driven) adapters implementing the domain ports.

pub mod corpus;
pub mod persistence;
pub mod pipeline;
pub mod security;
