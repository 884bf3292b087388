//! The token report and its progressive assembly.

use crate::engine::{Branch, ChainFacts, MetadataFacts};
use cashscope_authchain::{cross_check_domains, merge_timeline, AuthHead, LatestPublication};
use cashscope_types::{
    AuthchainEntry, Diagnostic, MetadataDocument, Network, Timestamp, TokenId, TokenKind,
    TokenSupplySnapshot, TxHash,
};
use serde::Serialize;

/// Everything the explorer knows about one token category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TokenReport {
    pub overview: Overview,
    pub supply: TokenSupplySnapshot,
    /// Authchain in chain order, enriched with registry revisions.
    pub timeline: Vec<AuthchainEntry>,
    pub metadata: MetadataReport,
    /// Non-fatal problems met while resolving metadata, in order.
    pub diagnostics: Vec<Diagnostic>,
    /// Listed in the trust registry.
    pub trust_verified: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Overview {
    pub token_id: TokenId,
    pub network: Network,
    pub token_kind: TokenKind,
    pub genesis_tx: TxHash,
    pub genesis_timestamp: Option<Timestamp>,
    pub authchain_length: u64,
    pub auth_head: AuthHead,
    pub auth_head_timestamp: Option<Timestamp>,
    /// Publications in the on-chain timeline.
    pub metadata_updates: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MetadataReport {
    pub metadata_location: Option<String>,
    pub https_url: Option<String>,
    pub document: Option<MetadataDocument>,
    pub is_schema_valid: Option<bool>,
    pub hash_match: Option<bool>,
    pub icon_url: Option<String>,
    /// Publications seen by the metadata branch.
    pub authchain_updates: usize,
    /// Registry host and the document's website share a base domain.
    pub domains_match: Option<bool>,
    pub latest_publication: Option<LatestPublication>,
}

/// Accumulates one immutable value per finished branch.
///
/// Branches land in any order; [`ReportBuilder::finish`] needs the chain
/// branch and treats the other two as empty when missing.
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    chain: Option<ChainFacts>,
    metadata: Option<MetadataFacts>,
    trust: Option<bool>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, branch: Branch) {
        match branch {
            Branch::Chain(facts) => self.chain = Some(facts),
            Branch::Metadata(facts) => self.metadata = Some(facts),
            Branch::Trust(verified) => self.trust = Some(verified),
        }
    }

    pub fn chain(&self) -> Option<&ChainFacts> {
        self.chain.as_ref()
    }

    pub fn metadata(&self) -> Option<&MetadataFacts> {
        self.metadata.as_ref()
    }

    pub fn trust(&self) -> Option<bool> {
        self.trust
    }

    pub fn is_complete(&self) -> bool {
        self.chain.is_some() && self.metadata.is_some() && self.trust.is_some()
    }

    /// Assemble the report; `None` until the chain branch has landed.
    pub fn finish(self, token: &TokenId, network: Network) -> Option<TokenReport> {
        let chain = self.chain?;
        let metadata = self.metadata.unwrap_or_default();

        let timeline = merge_timeline(token, &chain.authchain.entries, &metadata.revisions);
        let overview = Overview {
            token_id: *token,
            network,
            token_kind: chain.supply.token_kind(),
            genesis_tx: chain.genesis.tx_hash,
            genesis_timestamp: chain.genesis.timestamp,
            authchain_length: chain.authchain.length,
            auth_head: chain.authchain.head.clone(),
            auth_head_timestamp: timeline.last().and_then(|e| e.timestamp),
            metadata_updates: chain.authchain.metadata_updates(),
        };

        let resolution = metadata.resolution;
        let domains_match = cross_check_domains(
            resolution.https_url.as_deref(),
            resolution.document.as_ref().and_then(MetadataDocument::web_uri),
        );
        let report = MetadataReport {
            metadata_location: resolution.metadata_location,
            https_url: resolution.https_url,
            document: resolution.document,
            is_schema_valid: resolution.is_schema_valid,
            hash_match: resolution.hash_match,
            icon_url: resolution.icon_url,
            authchain_updates: resolution.authchain_updates,
            domains_match,
            latest_publication: metadata.latest,
        };

        Some(TokenReport {
            overview,
            supply: chain.supply,
            timeline,
            metadata: report,
            diagnostics: resolution.diagnostics,
            trust_verified: self.trust.unwrap_or(false),
        })
    }
}
