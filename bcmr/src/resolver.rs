//! Metadata resolution for one token.
//!
//! Resolution is a linear state machine:
//!
//! ```text
//! Start -> Located -> Imported -> Validated -> HashChecked -> Done
//! ```
//!
//! Any step may jump straight to `Done`. Failures never abort the walk; each
//! one becomes a [`Diagnostic`] and the result carries whatever was learned
//! before it.
//!
//! The hash check fetches the document a second time, independently of the
//! import, and runs concurrently with schema validation.

use crate::location::{icon_url, resolve_https_url};
use crate::registry::{extract_document, Registry};
use crate::schema::{validate, SchemaKind};
use cashscope_authchain::RegistryRevision;
use cashscope_crypto::sha256_hex;
use cashscope_sources::{FetchError, FetchResponse, HttpFetch};
use cashscope_types::{Diagnostic, MetadataDocument, TokenId};
use serde::Serialize;
use serde_json::Value;

/// Everything learned about a token's off-chain metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MetadataResolution {
    /// First URI declared by the newest publication.
    pub metadata_location: Option<String>,
    /// Where that URI was fetched from.
    pub https_url: Option<String>,
    pub document: Option<MetadataDocument>,
    /// `None` when no identity record was obtained.
    pub is_schema_valid: Option<bool>,
    /// `None` when the document could not be fetched for hashing. A
    /// publication that commits to no hash never matches.
    pub hash_match: Option<bool>,
    /// Number of metadata publications in the authchain.
    pub authchain_updates: usize,
    pub icon_url: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The registry a resolution is working on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub declared: String,
    pub fetch_url: String,
    pub expected_hash: Option<String>,
}

/// Result of the independent re-fetch used for hashing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HashOutcome {
    Unreachable(String),
    Status(u16),
    Digest(String),
}

/// Where a resolution currently stands.
#[derive(Debug)]
pub enum ResolverState {
    Start,
    Located(Location),
    Imported {
        location: Location,
        snapshot: Option<Value>,
    },
    Validated {
        location: Location,
        hash: HashOutcome,
    },
    HashChecked,
    Done,
}

struct Resolver<'a> {
    fetcher: &'a dyn HttpFetch,
    token: &'a TokenId,
    revisions: &'a [RegistryRevision],
    gateway: &'a str,
    result: MetadataResolution,
}

impl Resolver<'_> {
    async fn advance(&mut self, state: ResolverState) -> ResolverState {
        match state {
            ResolverState::Start => self.locate(),
            ResolverState::Located(location) => self.import(location).await,
            ResolverState::Imported { location, snapshot } => {
                self.validate_and_hash(location, snapshot).await
            }
            ResolverState::Validated { location, hash } => self.check_hash(location, hash),
            ResolverState::HashChecked | ResolverState::Done => ResolverState::Done,
        }
    }

    fn locate(&mut self) -> ResolverState {
        let Some(latest) = self.revisions.last() else {
            return ResolverState::Done;
        };
        let Some(declared) = latest.uris.first().cloned() else {
            tracing::debug!(token = %self.token, tx = %latest.tx_hash, "newest publication declares no location");
            return ResolverState::Done;
        };
        self.result.metadata_location = Some(declared.clone());

        let fetch_url = latest
            .https_url
            .clone()
            .or_else(|| resolve_https_url(&declared, self.gateway));
        let Some(fetch_url) = fetch_url else {
            tracing::debug!(token = %self.token, uri = %declared, "registry location is not fetchable");
            return ResolverState::Done;
        };
        self.result.https_url = Some(fetch_url.clone());

        ResolverState::Located(Location {
            declared,
            fetch_url,
            expected_hash: latest.content_hash.clone(),
        })
    }

    async fn import(&mut self, location: Location) -> ResolverState {
        let snapshot = match self.fetcher.get(&location.fetch_url).await {
            Err(e) => {
                self.result
                    .diagnostics
                    .push(Diagnostic::fetch_failed(&location.fetch_url, &e));
                None
            }
            // Reported as http_error by the hash check.
            Ok(response) if !response.is_success() => None,
            Ok(response) => match Registry::from_slice(&response.body) {
                Err(e) => {
                    self.result
                        .diagnostics
                        .push(Diagnostic::invalid_json(&location.fetch_url, &e));
                    None
                }
                Ok(registry) => {
                    let snapshot = registry.latest_snapshot(self.token).cloned();
                    if snapshot.is_none() {
                        tracing::debug!(token = %self.token, url = %location.fetch_url, "registry has no identity for token");
                    }
                    snapshot
                }
            },
        };
        ResolverState::Imported { location, snapshot }
    }

    async fn validate_and_hash(
        &mut self,
        location: Location,
        snapshot: Option<Value>,
    ) -> ResolverState {
        let fetcher = self.fetcher;
        let validation =
            async { snapshot.as_ref().map(|s| validate(s, SchemaKind::IdentitySnapshot)) };
        let hash = async { hash_outcome(fetcher.get(&location.fetch_url).await) };
        let (validation, hash) = tokio::join!(validation, hash);

        if let (Some(snapshot), Some(validation)) = (snapshot.as_ref(), validation) {
            self.result.is_schema_valid = Some(validation.valid);
            if !validation.valid {
                self.result
                    .diagnostics
                    .push(Diagnostic::schema_invalid(validation.issues));
            }
            let document = extract_document(snapshot);
            self.result.icon_url = icon_url(&document, self.gateway);
            self.result.document = Some(document);
        }
        ResolverState::Validated { location, hash }
    }

    fn check_hash(&mut self, location: Location, hash: HashOutcome) -> ResolverState {
        match hash {
            HashOutcome::Unreachable(reason) => {
                self.result
                    .diagnostics
                    .push(Diagnostic::fetch_failed(&location.fetch_url, reason));
            }
            HashOutcome::Status(status) => {
                self.result.hash_match = Some(false);
                self.result
                    .diagnostics
                    .push(Diagnostic::http_error(&location.fetch_url, status));
            }
            HashOutcome::Digest(actual) => match location.expected_hash.as_deref() {
                None => {
                    tracing::debug!(token = %self.token, uri = %location.declared, "publication commits to no content hash");
                    self.result.hash_match = Some(false);
                }
                Some(expected) if expected.eq_ignore_ascii_case(&actual) => {
                    self.result.hash_match = Some(true);
                }
                Some(expected) => {
                    self.result.hash_match = Some(false);
                    self.result
                        .diagnostics
                        .push(Diagnostic::hash_mismatch(expected, &actual));
                }
            },
        }
        ResolverState::HashChecked
    }
}

fn hash_outcome(response: Result<FetchResponse, FetchError>) -> HashOutcome {
    match response {
        Err(e) => HashOutcome::Unreachable(e.to_string()),
        Ok(response) if !response.is_success() => HashOutcome::Status(response.status),
        Ok(response) => HashOutcome::Digest(sha256_hex(&response.body)),
    }
}

/// Locate, import, validate and hash-check the newest registry published
/// for `token`.
///
/// `revisions` are the token's publications in chain order.
pub async fn resolve_metadata(
    fetcher: &dyn HttpFetch,
    token: &TokenId,
    revisions: &[RegistryRevision],
    gateway: &str,
) -> MetadataResolution {
    let mut resolver = Resolver {
        fetcher,
        token,
        revisions,
        gateway,
        result: MetadataResolution {
            authchain_updates: revisions.len(),
            ..Default::default()
        },
    };

    let mut state = ResolverState::Start;
    while !matches!(state, ResolverState::Done) {
        state = resolver.advance(state).await;
    }

    for diagnostic in &resolver.result.diagnostics {
        tracing::warn!(%token, kind = %diagnostic.kind, "{}", diagnostic.message);
    }
    resolver.result
}
