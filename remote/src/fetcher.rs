//! reqwest-backed document fetcher.

use async_trait::async_trait;
use cashscope_sources::{FetchError, FetchResponse, HttpFetch};
use std::time::Duration;

/// [`HttpFetch`] over a shared reqwest connection pool.
#[derive(Clone, Default)]
pub struct ReqwestFetcher {
    http_client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            http_client: builder.build().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let response = self.http_client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Transport(format!("request timed out: {e}"))
            } else if e.is_connect() {
                FetchError::Transport(format!("connection failed: {e}"))
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("reading body failed: {e}")))?;
        tracing::debug!(url, status, bytes = body.len(), "fetched document");

        Ok(FetchResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_url_is_rejected_before_sending() {
        let err = ReqwestFetcher::new().get("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let fetcher = ReqwestFetcher::with_timeout(Some(Duration::from_secs(2)));
        let err = fetcher.get("http://127.0.0.1:1/bcmr.json").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
