//! HTTP adapter for the delegated QA pipeline service.

pub mod dto;
pub mod http_client;

pub use http_client::HttpQaPipeline;
