//! HTTP client implementation

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::LoaderError;

/// Result of a single GET
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 2xx response with its decoded JSON body
    Found(Value),
    /// Any other status code
    Failed(u16),
}

/// Fetches JSON documents, one attempt per call
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<FetchOutcome, LoaderError>;
}

/// `reqwest` backed client; one instance (and connection pool) per run
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, LoaderError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn fetch_json(&self, url: &str) -> Result<FetchOutcome, LoaderError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "GET");

        if !status.is_success() {
            return Ok(FetchOutcome::Failed(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(FetchOutcome::Found(serde_json::from_slice(&body)?))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Serves canned documents; unknown urls answer 404
    #[derive(Default)]
    pub(crate) struct StaticClient {
        documents: HashMap<String, Value>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticClient {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with(mut self, url: &str, document: Value) -> Self {
            self.documents.insert(url.to_string(), document);
            self
        }

        /// Requested urls in call order
        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for StaticClient {
        async fn fetch_json(&self, url: &str) -> Result<FetchOutcome, LoaderError> {
            self.calls.lock().unwrap().push(url.to_string());
            Ok(match self.documents.get(url) {
                Some(document) => FetchOutcome::Found(document.clone()),
                None => FetchOutcome::Failed(404),
            })
        }
    }
}
