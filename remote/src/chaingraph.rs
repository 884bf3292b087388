//! Chaingraph GraphQL client.

use crate::queries;
use crate::wire::{self, GraphqlResponse, OutputsData, TransactionsData};
use async_trait::async_trait;
use cashscope_sources::{AuthchainRecord, GenesisRecord, Indexer, SourceError};
use cashscope_types::{TokenId, UnspentOutput};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// [`Indexer`] backed by a Chaingraph instance.
///
/// Every query is `POST {url}` with body
/// `{"operationName": null, "variables": {}, "query": ...}`.
#[derive(Clone)]
pub struct ChaingraphClient {
    url: String,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl ChaingraphClient {
    /// Client with the transport's default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, None)
    }

    /// Client with an overall request timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            url: url.into(),
            http_client: builder.build().unwrap_or_default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn query<T: DeserializeOwned>(&self, query: String) -> Result<T, SourceError> {
        let body = serde_json::json!({
            "operationName": null,
            "variables": {},
            "query": query,
        });

        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Transport(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    SourceError::Transport(format!("connection failed: {e}"))
                } else {
                    SourceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let parsed: GraphqlResponse<T> = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(format!("failed to parse response: {e}")))?;

        if !parsed.errors.is_empty() {
            let messages: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
            return Err(SourceError::Query(messages.join("; ")));
        }

        parsed
            .data
            .ok_or_else(|| SourceError::Malformed("response has no data".into()))
    }

    async fn outputs(&self, query: String) -> Result<Vec<UnspentOutput>, SourceError> {
        let data: OutputsData = self.query(query).await?;
        wire::normalize_outputs(data.output)
    }
}

#[async_trait]
impl Indexer for ChaingraphClient {
    async fn genesis(&self, token: &TokenId) -> Result<Option<GenesisRecord>, SourceError> {
        tracing::debug!(%token, "querying genesis transaction");
        let data: TransactionsData = self.query(queries::genesis(token)).await?;
        wire::normalize_genesis(data)
    }

    async fn token_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError> {
        tracing::debug!(%token, offset, "querying token outputs");
        self.outputs(queries::token_outputs(token, offset)).await
    }

    async fn nft_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError> {
        tracing::debug!(%token, offset, "querying nft outputs");
        self.outputs(queries::nft_outputs(token, offset)).await
    }

    async fn minting_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError> {
        tracing::debug!(%token, offset, "querying minting outputs");
        self.outputs(queries::minting_outputs(token, offset)).await
    }

    async fn authchain(&self, token: &TokenId) -> Result<Option<AuthchainRecord>, SourceError> {
        tracing::debug!(%token, "querying authchain");
        let data: TransactionsData = self.query(queries::authchain(token)).await?;
        wire::normalize_authchain(data)
    }
}
