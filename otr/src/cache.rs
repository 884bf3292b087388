//! Single-flight trust registry cache.

use cashscope_bcmr::{validate, Registry, SchemaKind};
use cashscope_sources::HttpFetch;
use cashscope_types::TokenId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Lazily loaded trust registry.
///
/// Concurrent callers share one in-flight fetch. The outcome, including a
/// failure, is kept for the lifetime of the cache.
pub struct TrustRegistryCache {
    url: String,
    registry: OnceCell<Option<Arc<Registry>>>,
    fetches: AtomicUsize,
}

impl TrustRegistryCache {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            registry: OnceCell::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the registry has been fetched (successfully or not).
    pub fn is_loaded(&self) -> bool {
        self.registry.initialized()
    }

    /// Number of network fetches performed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Whether the trust registry lists `token`.
    pub async fn is_verified(&self, fetcher: &dyn HttpFetch, token: &TokenId) -> bool {
        let Some(registry) = self.registry(fetcher).await else {
            return false;
        };
        registry
            .as_value()
            .get("identities")
            .and_then(|identities| identities.get(token.to_hex()))
            .is_some()
    }

    async fn registry(&self, fetcher: &dyn HttpFetch) -> Option<Arc<Registry>> {
        self.registry
            .get_or_init(|| self.load(fetcher))
            .await
            .clone()
    }

    async fn load(&self, fetcher: &dyn HttpFetch) -> Option<Arc<Registry>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(url = %self.url, "fetching trust registry");

        let response = match fetcher.get(&self.url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "trust registry unavailable");
                return None;
            }
        };
        if !response.is_success() {
            tracing::warn!(url = %self.url, status = response.status, "trust registry unavailable");
            return None;
        }
        let registry = match Registry::from_slice(&response.body) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "trust registry unreadable");
                return None;
            }
        };
        let validation = validate(registry.as_value(), SchemaKind::Registry);
        if !validation.valid {
            tracing::warn!(
                url = %self.url,
                issues = validation.issues.len(),
                first = ?validation.issues.first().map(ToString::to_string),
                "trust registry fails schema validation"
            );
            return None;
        }

        let listed = registry
            .as_value()
            .get("identities")
            .and_then(|i| i.as_object())
            .map_or(0, |i| i.len());
        tracing::info!(url = %self.url, identities = listed, "trust registry loaded");
        Some(Arc::new(registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashscope_nullables::fixtures::token_id;
    use cashscope_nullables::NullFetcher;
    use cashscope_sources::FetchError;
    use serde_json::json;
    use std::time::Duration;

    const URL: &str = "https://otr.example/.well-known/bitcoin-cash-metadata-registry.json";

    fn otr_registry() -> serde_json::Value {
        json!({
            "version": {"major": 2, "minor": 1, "patch": 0},
            "latestRevision": "2024-01-01T00:00:00.000Z",
            "registryIdentity": {"name": "OpenTokenRegistry"},
            "identities": {
                token_id(0x01).to_hex(): {
                    "2024-01-01T00:00:00.000Z": {"name": "Listed"}
                }
            }
        })
    }

    #[tokio::test]
    async fn listed_token_is_verified() {
        let fetcher = NullFetcher::new();
        fetcher.respond_json(URL, &otr_registry());
        let cache = TrustRegistryCache::new(URL);

        assert!(cache.is_verified(&fetcher, &token_id(0x01)).await);
        assert!(!cache.is_verified(&fetcher, &token_id(0x02)).await);
        assert_eq!(fetcher.call_count(URL), 1);
        assert_eq!(cache.fetch_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_checks_share_one_fetch() {
        let fetcher = NullFetcher::new().with_delay(Duration::from_millis(50));
        fetcher.respond_json(URL, &otr_registry());
        let cache = TrustRegistryCache::new(URL);

        let listed = token_id(0x01);
        let unlisted = token_id(0x03);
        let (a, b) = tokio::join!(
            cache.is_verified(&fetcher, &listed),
            cache.is_verified(&fetcher, &unlisted),
        );
        assert!(a);
        assert!(!b);
        assert_eq!(fetcher.call_count(URL), 1);
    }

    #[tokio::test]
    async fn failures_read_as_unverified_and_are_cached() {
        let fetcher = NullFetcher::new();
        fetcher.fail(URL, FetchError::Transport("dns".into()));
        let cache = TrustRegistryCache::new(URL);

        assert!(!cache.is_verified(&fetcher, &token_id(0x01)).await);
        fetcher.respond_json(URL, &otr_registry());
        assert!(!cache.is_verified(&fetcher, &token_id(0x01)).await);
        assert!(cache.is_loaded());
        assert_eq!(fetcher.call_count(URL), 1);
    }

    #[tokio::test]
    async fn schema_invalid_registry_is_rejected() {
        let fetcher = NullFetcher::new();
        let mut registry = otr_registry();
        registry.as_object_mut().unwrap().remove("version");
        fetcher.respond_json(URL, &registry);

        let cache = TrustRegistryCache::new(URL);
        assert!(!cache.is_verified(&fetcher, &token_id(0x01)).await);
    }

    #[tokio::test]
    async fn http_error_is_unverified() {
        let fetcher = NullFetcher::new();
        fetcher.respond(URL, 500, "oops");
        let cache = TrustRegistryCache::new(URL);
        assert!(!cache.is_verified(&fetcher, &token_id(0x01)).await);
    }
}
