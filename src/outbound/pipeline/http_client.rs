//! Reqwest-backed QA pipeline adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and JSON decoding into domain answers. The
//! pipeline service itself hosts the document stores, retrievers, and
//! readers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::dto::{IndexBuildRequestDto, QueryRequestDto, QueryResponseDto};
use crate::domain::ports::{PipelineError, QaPipeline};
use crate::domain::{IndexBuildRequest, QaQuery, QaResult};

/// Index builds block on embedding generation, so the default timeout is
/// generous.
const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// QA pipeline adapter performing HTTP POST requests against one endpoint.
pub struct HttpQaPipeline {
    client: Client,
    base_url: Url,
}

impl HttpQaPipeline {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PipelineError> {
        self.base_url
            .join(path)
            .map_err(|err| PipelineError::transport(format!("invalid pipeline url: {err}")))
    }
}

fn map_transport_error(error: reqwest::Error) -> PipelineError {
    PipelineError::transport(error.to_string())
}

#[async_trait]
impl QaPipeline for HttpQaPipeline {
    async fn build_index(&self, request: &IndexBuildRequest) -> Result<(), PipelineError> {
        let body = IndexBuildRequestDto::from(request);
        let response = self
            .client
            .post(self.endpoint("index")?)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn run_query(&self, query: &QaQuery) -> Result<QaResult, PipelineError> {
        let body = QueryRequestDto::from(query);
        let response = self
            .client
            .post(self.endpoint("query")?)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(PipelineError::Status {
                status: status.as_u16(),
            });
        }

        let decoded: QueryResponseDto = serde_json::from_slice(&bytes)
            .map_err(|err| PipelineError::decode(format!("invalid pipeline JSON: {err}")))?;
        Ok(decoded.into_domain())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("http://pipeline:9000/", "index", "http://pipeline:9000/index")]
    #[case("http://pipeline:9000/qa/", "query", "http://pipeline:9000/qa/query")]
    fn endpoints_join_relative_paths(
        #[case] base: &str,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        let adapter = HttpQaPipeline::new(Url::parse(base).expect("valid url")).expect("client");
        let joined = adapter.endpoint(path).expect("joins");
        assert_eq!(joined.as_str(), expected);
    }
}
