//! Optional dense-retrieval capability for probe background context.
//!
//! Injected as `Option<Arc<dyn Retriever>>`; every prompting mode works
//! without it.

use std::time::Duration;

use anyhow::Result;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievedDoc {
    pub docid: String,
    /// First line is the article title, remainder the passage body.
    pub contents: String,
}

#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDoc>>;
}

#[derive(Debug, Deserialize)]
struct SearchResp {
    #[serde(default)]
    hits: Vec<RetrievedDoc>,
}

/// HTTP client for a dense-index search service (FAISS/DPR behind a REST
/// endpoint). Rate-limited; the service is assumed local and fast.
pub struct DenseSearcher {
    http: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
    top_k: usize,
}

impl DenseSearcher {
    pub fn new(base_url: String, top_k: usize, timeout_ms: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        let limiter = RateLimiter::direct(Quota::per_second(nonzero!(16u32)));
        Ok(Self { http, base_url, limiter, top_k })
    }
}

#[async_trait::async_trait]
impl Retriever for DenseSearcher {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDoc>> {
        self.limiter.until_ready().await;
        let resp = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&serde_json::json!({ "q": query, "k": self.top_k }))
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResp>()
            .await?;
        Ok(resp.hits.into_iter().take(self.top_k).collect())
    }
}
