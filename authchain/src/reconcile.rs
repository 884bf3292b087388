//! Merging registry-side revision history into the on-chain timeline.
//!
//! The chain decides which entries exist and in which order. A registry can
//! only add detail (content hash, URIs, resolved location) to an entry with
//! the same transaction hash.

use cashscope_types::{AuthchainEntry, TokenId, TxHash};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// One historical revision of a token's registry, keyed by the transaction
/// that published it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRevision {
    pub tx_hash: TxHash,
    pub content_hash: Option<String>,
    pub uris: Vec<String>,
    pub https_url: Option<String>,
}

/// Enrich `on_chain` with `revisions`, keeping on-chain order and timestamps.
///
/// A matched entry is a metadata update by definition. Genesis is the entry
/// equal to the token id and the head is the last entry; both flags are
/// recomputed, never reordered.
pub fn merge_timeline(
    token: &TokenId,
    on_chain: &[AuthchainEntry],
    revisions: &[RegistryRevision],
) -> Vec<AuthchainEntry> {
    let by_hash: HashMap<TxHash, &RegistryRevision> =
        revisions.iter().map(|r| (r.tx_hash, r)).collect();
    let last = on_chain.len().saturating_sub(1);

    on_chain
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut merged = entry.clone();
            if let Some(revision) = by_hash.get(&entry.tx_hash) {
                merged.is_metadata_update = true;
                merged.content_hash = revision.content_hash.clone();
                merged.uris = revision.uris.clone();
                merged.https_url = revision.https_url.clone();
            }
            merged.is_genesis = entry.tx_hash == token.genesis_tx();
            merged.is_auth_head = i == last;
            merged
        })
        .collect()
}

/// Registrable part of a URL's host: its last two DNS labels.
///
/// `https://cdn.tokens.example.com/x` → `example.com`. IP addresses and
/// single-label hosts are returned whole.
pub fn base_domain(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    if host.starts_with('[') || host.parse::<Ipv4Addr>().is_ok() {
        return Some(host);
    }
    let labels: Vec<&str> = host.split('.').collect();
    let start = labels.len().saturating_sub(2);
    Some(labels[start..].join("."))
}

/// Whether the registry is hosted on the same site the document links as its
/// website. `None` when either side is missing or unparseable.
pub fn cross_check_domains(registry_url: Option<&str>, web_uri: Option<&str>) -> Option<bool> {
    let registry = base_domain(registry_url?)?;
    let web = base_domain(web_uri?)?;
    Some(registry == web)
}
