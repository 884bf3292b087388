//! Lookup orchestration.

use crate::config::ExplorerConfig;
use crate::error::{LookupCause, LookupError};
use crate::metrics::ExplorerMetrics;
use crate::report::{ReportBuilder, TokenReport};
use cashscope_authchain::{
    build_authchain, latest_publication, walk_authchain, LatestPublication, RegistryRevision,
    WalkedAuthchain,
};
use cashscope_bcmr::{publication_revisions, resolve_metadata, MetadataResolution};
use cashscope_otr::TrustRegistryCache;
use cashscope_remote::{ChaingraphClient, ReqwestFetcher};
use cashscope_sources::{collect_pages, GenesisRecord, HttpFetch, Indexer};
use cashscope_supply::{build_snapshot, reserved_supply_ft, SupplyInputs};
use cashscope_types::{Network, TokenId, TokenSupplySnapshot};
use std::sync::Arc;
use std::time::Instant;

/// On-chain facts: everything the chain branch produces.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainFacts {
    pub genesis: GenesisRecord,
    pub supply: TokenSupplySnapshot,
    pub authchain: WalkedAuthchain,
}

/// Off-chain facts produced by the metadata branch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataFacts {
    pub resolution: MetadataResolution,
    /// Registry history decoded from the authchain's publications.
    pub revisions: Vec<RegistryRevision>,
    pub latest: Option<LatestPublication>,
}

/// One finished lookup branch.
#[derive(Clone, Debug, PartialEq)]
pub enum Branch {
    Chain(ChainFacts),
    Metadata(MetadataFacts),
    Trust(bool),
}

/// Receives branch results as they complete.
pub trait BranchSink: Send + Sync {
    fn commit(&self, branch: Branch);
}

impl BranchSink for () {
    fn commit(&self, _branch: Branch) {}
}

pub struct Explorer {
    indexer: Arc<dyn Indexer>,
    fetcher: Arc<dyn HttpFetch>,
    trust: TrustRegistryCache,
    network: Network,
    ipfs_gateway: String,
    metrics: Option<Arc<ExplorerMetrics>>,
}

impl Explorer {
    pub fn new(
        indexer: Arc<dyn Indexer>,
        fetcher: Arc<dyn HttpFetch>,
        config: &ExplorerConfig,
    ) -> Self {
        Self {
            indexer,
            fetcher,
            trust: TrustRegistryCache::new(config.otr_registry_url.clone()),
            network: config.network,
            ipfs_gateway: config.ipfs_gateway.clone(),
            metrics: None,
        }
    }

    /// An explorer talking to the configured Chaingraph instance over HTTP.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        let timeout = config.request_timeout();
        Self::new(
            Arc::new(ChaingraphClient::with_timeout(
                config.chaingraph_url.clone(),
                timeout,
            )),
            Arc::new(ReqwestFetcher::with_timeout(timeout)),
            config,
        )
    }

    pub fn with_metrics(mut self, metrics: Arc<ExplorerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn trust_cache(&self) -> &TrustRegistryCache {
        &self.trust
    }

    pub fn metrics(&self) -> Option<&Arc<ExplorerMetrics>> {
        self.metrics.as_ref()
    }

    /// Parse user input and look the token up.
    pub async fn lookup_input(&self, input: &str) -> Result<TokenReport, LookupError> {
        let token = TokenId::parse(input).map_err(LookupError::Malformed)?;
        self.lookup(&token).await
    }

    pub async fn lookup(&self, token: &TokenId) -> Result<TokenReport, LookupError> {
        self.lookup_with(token, &()).await
    }

    /// Run all three branches concurrently, handing each result to `sink`
    /// as soon as it is available, and assemble the report.
    ///
    /// A failed chain branch ends the lookup at once; the other branches
    /// are dropped unfinished.
    pub async fn lookup_with(
        &self,
        token: &TokenId,
        sink: &dyn BranchSink,
    ) -> Result<TokenReport, LookupError> {
        let started = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.lookups_started.inc();
        }
        tracing::info!(%token, network = %self.network, "lookup started");

        let chain = async {
            let facts = self.chain_branch(token).await;
            if let Ok(facts) = &facts {
                sink.commit(Branch::Chain(facts.clone()));
            }
            facts
        };
        let metadata = async {
            let facts = self.metadata_branch(token).await;
            sink.commit(Branch::Metadata(facts.clone()));
            Ok::<_, LookupError>(facts)
        };
        let trust = async {
            let verified = self.trust.is_verified(self.fetcher.as_ref(), token).await;
            sink.commit(Branch::Trust(verified));
            Ok::<_, LookupError>(verified)
        };
        let joined = tokio::try_join!(chain, metadata, trust);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let Some(metrics) = &self.metrics {
            metrics.lookup_latency_ms.observe(elapsed_ms);
            metrics
                .trust_registry_fetches
                .set(self.trust.fetch_count() as i64);
        }

        let (chain, metadata, trust) = match joined {
            Ok(branches) => branches,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.lookups_failed.inc();
                }
                tracing::warn!(%token, error = %e, cause = ?std::error::Error::source(&e).map(ToString::to_string), "lookup failed");
                return Err(e);
            }
        };

        if let Some(metrics) = &self.metrics {
            for diagnostic in &metadata.resolution.diagnostics {
                metrics.record_diagnostic(diagnostic.kind);
            }
        }

        let mut builder = ReportBuilder::new();
        builder.apply(Branch::Chain(chain));
        builder.apply(Branch::Metadata(metadata));
        builder.apply(Branch::Trust(trust));
        let report = builder
            .finish(token, self.network)
            .ok_or(LookupError::InvalidTokenId(LookupCause::NoGenesis))?;

        tracing::info!(
            %token,
            elapsed_ms = elapsed_ms as u64,
            kind = ?report.overview.token_kind,
            diagnostics = report.diagnostics.len(),
            trusted = report.trust_verified,
            "lookup finished"
        );
        Ok(report)
    }

    /// The five indexer queries, issued concurrently, all-or-nothing.
    async fn chain_branch(&self, token: &TokenId) -> Result<ChainFacts, LookupError> {
        let indexer = self.indexer.as_ref();

        let (genesis, token_outputs, nft_outputs, minting_outputs, authchain) = tokio::try_join!(
            indexer.genesis(token),
            collect_pages(move |offset| indexer.token_outputs(token, offset)),
            collect_pages(move |offset| indexer.nft_outputs(token, offset)),
            collect_pages(move |offset| indexer.minting_outputs(token, offset)),
            indexer.authchain(token),
        )?;

        if let Some(metrics) = &self.metrics {
            let pages = token_outputs.pages + nft_outputs.pages + minting_outputs.pages + 2;
            metrics.indexer_pages.inc_by(pages as u64);
        }
        tracing::debug!(
            %token,
            token_outputs = token_outputs.rows.len(),
            nft_outputs = nft_outputs.rows.len(),
            minting_outputs = minting_outputs.rows.len(),
            "indexer queries complete"
        );

        let genesis = genesis.ok_or(LookupCause::NoGenesis)?;
        let record = authchain.ok_or(LookupCause::Authchain(
            cashscope_authchain::AuthchainError::NotFound,
        ))?;
        let authchain =
            build_authchain(token, record, self.network).map_err(LookupCause::Authchain)?;

        let supply = build_snapshot(SupplyInputs {
            genesis_outputs: &genesis.outputs,
            token_outputs: &token_outputs.rows,
            nft_outputs: &nft_outputs.rows,
            minting_outputs: &minting_outputs.rows,
            reserved: reserved_supply_ft(authchain.identity_output.as_ref()),
        })
        .map_err(LookupCause::Supply)?;

        Ok(ChainFacts {
            genesis,
            supply,
            authchain,
        })
    }

    /// Walk the authchain on its own and resolve the newest publication.
    /// Never fails: a chain-side problem here leaves the metadata empty.
    async fn metadata_branch(&self, token: &TokenId) -> MetadataFacts {
        let chain = match walk_authchain(self.indexer.as_ref(), token, self.network).await {
            Ok(chain) => chain,
            Err(e) => {
                tracing::debug!(%token, error = %e, "no authchain for metadata");
                return MetadataFacts::default();
            }
        };

        let revisions = publication_revisions(&chain.entries, &self.ipfs_gateway);
        let latest = latest_publication(&chain.entries).unwrap_or_else(|e| {
            tracing::debug!(%token, error = %e, "newest publication does not decode");
            None
        });
        let resolution =
            resolve_metadata(self.fetcher.as_ref(), token, &revisions, &self.ipfs_gateway).await;

        MetadataFacts {
            resolution,
            revisions,
            latest,
        }
    }
}
