//! End-to-end lookups against the nullable indexer and fetcher.

use cashscope_crypto::sha256;
use cashscope_explorer::{
    Explorer, ExplorerConfig, ExplorerMetrics, ExplorerSession, LookupError, SessionStatus,
};
use cashscope_nullables::fixtures::{self, migration, p2pkh, publication, tx};
use cashscope_nullables::{IndexerCall, NullFetcher, NullIndexer, TokenFixture};
use cashscope_sources::{SourceError, PAGE_SIZE};
use cashscope_types::{
    DiagnosticKind, NftCapability, TokenId, TokenKind, UnspentOutput,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const REGISTRY_URL: &str = "https://tokens.example.com/bcmr.json";
const OTR_URL: &str = "https://otr.example/registry.json";

fn config() -> ExplorerConfig {
    ExplorerConfig {
        otr_registry_url: OTR_URL.to_string(),
        ..Default::default()
    }
}

fn registry_body(token: &TokenId) -> String {
    json!({
        "version": {"major": 1, "minor": 0, "patch": 0},
        "latestRevision": "2024-01-01T00:00:00.000Z",
        "registryIdentity": {"name": "Example"},
        "identities": {
            token.to_hex(): {
                "2024-01-01T00:00:00.000Z": {
                    "name": "Example Token",
                    "token": {"category": token.to_hex(), "symbol": "XMPL", "decimals": 2},
                    "uris": {"icon": "ipfs://bafyicon", "web": "https://www.example.com"}
                }
            }
        }
    })
    .to_string()
}

fn otr_body(listed: &TokenId) -> serde_json::Value {
    json!({
        "version": {"major": 1, "minor": 0, "patch": 0},
        "latestRevision": "2024-01-01T00:00:00.000Z",
        "registryIdentity": {"name": "OTR"},
        "identities": {listed.to_hex(): {"2024-01-01T00:00:00.000Z": {"name": "Listed"}}}
    })
}

/// A fungible token: 1,000,000 minted, 900 units burned, 100,000 reserved
/// on the identity output, one minting NFT held by a covenant.
fn fungible_fixture(token: TokenId, content_hash: &[u8]) -> TokenFixture {
    let minting = UnspentOutput::nft(p2pkh(7), NftCapability::Minting).with_outpoint(tx(0xe0), 0);
    TokenFixture {
        genesis: Some(fixtures::genesis(token, 1_690_000_000, &[1_000_000])),
        token_outputs: vec![
            UnspentOutput::fungible(p2pkh(2), 100_000).with_outpoint(tx(0xa1), 0),
            UnspentOutput::fungible(p2pkh(3), 899_000).with_outpoint(tx(0xa2), 0),
            UnspentOutput::fungible(p2pkh(3), 100).with_outpoint(tx(0xa3), 1),
            minting.clone(),
        ],
        nft_outputs: vec![minting.clone()],
        minting_outputs: vec![minting],
        authchain: Some(fixtures::authchain(
            vec![
                migration(token.genesis_tx(), Some(1_689_000_000), p2pkh(1), None),
                migration(
                    tx(0xb1),
                    Some(1_695_000_000),
                    p2pkh(2),
                    Some(publication(content_hash, &[REGISTRY_URL])),
                ),
            ],
            100_000,
        )),
        delay: None,
    }
}

#[tokio::test]
async fn full_lookup_of_a_fungible_token() {
    let token = fixtures::token_id(0x42);
    let body = registry_body(&token);
    let indexer = Arc::new(NullIndexer::new().with_token(token, fungible_fixture(token, &sha256(body.as_bytes()))));
    let fetcher = Arc::new(NullFetcher::new());
    fetcher.respond(REGISTRY_URL, 200, body);
    fetcher.respond_json(OTR_URL, &otr_body(&token));

    let metrics = Arc::new(ExplorerMetrics::new());
    let explorer = Explorer::new(indexer.clone(), fetcher.clone(), &config()).with_metrics(metrics.clone());
    let report = explorer.lookup(&token).await.unwrap();

    let supply = &report.supply;
    assert_eq!(supply.genesis_supply_ft.to_string(), "1000000");
    assert_eq!(supply.total_supply_ft.to_string(), "999100");
    assert_eq!(supply.burned_ft, 900);
    assert_eq!(supply.reserved_supply_ft.to_string(), "100000");
    assert_eq!(supply.circulating_supply_ft, 899_100);
    assert!(supply.has_active_minting_token);
    assert_eq!(supply.number_token_addresses, 3);

    assert_eq!(report.overview.token_kind, TokenKind::Both);
    assert_eq!(report.overview.authchain_length, 2);
    assert_eq!(report.overview.metadata_updates, 1);
    assert!(report.overview.auth_head.is_metadata_update);
    assert_eq!(report.timeline.len(), 2);
    assert!(report.timeline[1].is_auth_head);
    assert_eq!(report.timeline[1].https_url.as_deref(), Some(REGISTRY_URL));

    let metadata = &report.metadata;
    assert_eq!(metadata.hash_match, Some(true));
    assert_eq!(metadata.is_schema_valid, Some(true));
    assert_eq!(metadata.domains_match, Some(true));
    assert_eq!(metadata.document.as_ref().unwrap().symbol(), Some("XMPL"));
    assert_eq!(metadata.icon_url.as_deref(), Some("https://w3s.link/ipfs/bafyicon"));
    assert!(report.diagnostics.is_empty());
    assert!(report.trust_verified);

    assert_eq!(metrics.lookups_started.get(), 1);
    assert_eq!(metrics.lookups_failed.get(), 0);
    assert_eq!(metrics.indexer_pages.get(), 5);
}

#[tokio::test]
async fn five_queries_then_an_independent_metadata_walk() {
    let token = fixtures::token_id(0x43);
    let indexer = Arc::new(NullIndexer::new().with_token(token, fungible_fixture(token, &[0; 32])));
    let explorer = Explorer::new(indexer.clone(), Arc::new(NullFetcher::new()), &config());
    explorer.lookup(&token).await.unwrap();

    assert_eq!(indexer.call_count(IndexerCall::Genesis), 1);
    assert_eq!(indexer.call_count(IndexerCall::TokenOutputs), 1);
    assert_eq!(indexer.call_count(IndexerCall::NftOutputs), 1);
    assert_eq!(indexer.call_count(IndexerCall::MintingOutputs), 1);
    assert_eq!(indexer.call_count(IndexerCall::Authchain), 2);
}

#[tokio::test]
async fn metadata_problems_do_not_fail_the_lookup() {
    let token = fixtures::token_id(0x44);
    let indexer = Arc::new(NullIndexer::new().with_token(token, fungible_fixture(token, &[0x11; 32])));
    let fetcher = Arc::new(NullFetcher::new());
    fetcher.respond(REGISTRY_URL, 200, registry_body(&token));

    let metrics = Arc::new(ExplorerMetrics::new());
    let explorer = Explorer::new(indexer, fetcher, &config()).with_metrics(metrics.clone());
    let report = explorer.lookup(&token).await.unwrap();

    let kinds: Vec<_> = report.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::HashMismatch]);
    assert_eq!(report.metadata.hash_match, Some(false));
    assert!(report.metadata.document.is_some());
    // The trust registry answered 404.
    assert!(!report.trust_verified);
    assert_eq!(
        metrics
            .metadata_diagnostics
            .with_label_values(&["hash_mismatch"])
            .get(),
        1
    );
}

#[tokio::test]
async fn unknown_token_is_not_a_valid_token_id() {
    let explorer = Explorer::new(
        Arc::new(NullIndexer::new()),
        Arc::new(NullFetcher::new()),
        &config(),
    );
    let err = explorer.lookup(&fixtures::token_id(0x99)).await.unwrap_err();
    assert_eq!(err.to_string(), "the input is not a valid token id");
    assert!(!err.is_malformed());
}

#[tokio::test]
async fn invalid_token_is_reported_without_waiting_for_slow_hosts() {
    let fetcher = Arc::new(NullFetcher::new().with_delay(Duration::from_secs(10)));
    let explorer = Explorer::new(Arc::new(NullIndexer::new()), fetcher.clone(), &config());

    let outcome = tokio::time::timeout(
        Duration::from_secs(2),
        explorer.lookup(&fixtures::token_id(0x98)),
    )
    .await
    .expect("chain failure must not wait for the trust registry");
    assert!(matches!(outcome, Err(LookupError::InvalidTokenId(_))));
    assert!(fetcher.call_count(OTR_URL) <= 1);
}

#[tokio::test]
async fn indexer_failure_reads_like_an_invalid_token() {
    let token = fixtures::token_id(0x45);
    let indexer = Arc::new(NullIndexer::new().with_token(token, fungible_fixture(token, &[0; 32])));
    indexer.fail(IndexerCall::MintingOutputs, SourceError::Status(502));

    let metrics = Arc::new(ExplorerMetrics::new());
    let explorer = Explorer::new(indexer, Arc::new(NullFetcher::new()), &config()).with_metrics(metrics.clone());
    let err = explorer.lookup(&token).await.unwrap_err();
    assert_eq!(err.to_string(), "the input is not a valid token id");
    assert!(matches!(err, LookupError::InvalidTokenId(_)));
    assert_eq!(metrics.lookups_failed.get(), 1);
}

#[tokio::test]
async fn malformed_input_is_rejected_before_querying() {
    let indexer = Arc::new(NullIndexer::new());
    let explorer = Explorer::new(indexer.clone(), Arc::new(NullFetcher::new()), &config());
    let err = explorer.lookup_input("not-a-token").await.unwrap_err();
    assert!(err.is_malformed());
    assert!(indexer.calls().is_empty());
}

#[tokio::test]
async fn nft_collection_spanning_pages_is_counted_completely() {
    let token = fixtures::token_id(0x46);
    let nfts = fixtures::nft_outputs(PAGE_SIZE + 1);
    let indexer = Arc::new(NullIndexer::new().with_token(
        token,
        TokenFixture {
            genesis: Some(fixtures::genesis(token, 1_700_000_000, &[])),
            token_outputs: nfts.clone(),
            nft_outputs: nfts,
            authchain: Some(fixtures::authchain(
                vec![migration(token.genesis_tx(), Some(1), p2pkh(1), None)],
                0,
            )),
            ..Default::default()
        },
    ));
    let explorer = Explorer::new(indexer.clone(), Arc::new(NullFetcher::new()), &config());
    let report = explorer.lookup(&token).await.unwrap();

    assert_eq!(report.supply.total_supply_nfts, (PAGE_SIZE + 1) as u64);
    assert_eq!(report.overview.token_kind, TokenKind::NonFungible);
    assert!(!report.supply.has_active_minting_token);
    assert_eq!(indexer.call_count(IndexerCall::NftOutputs), 2);
}

#[tokio::test]
async fn minting_tokens_spanning_pages_are_counted_completely() {
    let token = fixtures::token_id(0x48);
    let minting: Vec<UnspentOutput> = fixtures::nft_outputs(PAGE_SIZE + 1)
        .into_iter()
        .map(|mut output| {
            output.nft_capability = Some(NftCapability::Minting);
            output
        })
        .collect();
    let indexer = Arc::new(NullIndexer::new().with_token(
        token,
        TokenFixture {
            genesis: Some(fixtures::genesis(token, 1_700_000_000, &[])),
            token_outputs: minting.clone(),
            nft_outputs: minting.clone(),
            minting_outputs: minting,
            authchain: Some(fixtures::authchain(
                vec![migration(token.genesis_tx(), Some(1), p2pkh(1), None)],
                0,
            )),
            ..Default::default()
        },
    ));
    let explorer = Explorer::new(indexer.clone(), Arc::new(NullFetcher::new()), &config());
    let report = explorer.lookup(&token).await.unwrap();

    assert_eq!(report.supply.minting_nfts, (PAGE_SIZE + 1) as u64);
    assert!(report.supply.has_active_minting_token);
    assert_eq!(indexer.call_count(IndexerCall::MintingOutputs), 2);
}

#[tokio::test]
async fn failed_page_aborts_the_lookup() {
    let token = fixtures::token_id(0x47);
    let indexer = Arc::new(NullIndexer::new().with_token(
        token,
        TokenFixture {
            genesis: Some(fixtures::genesis(token, 1_700_000_000, &[])),
            nft_outputs: fixtures::nft_outputs(PAGE_SIZE),
            authchain: Some(fixtures::authchain(
                vec![migration(token.genesis_tx(), Some(1), p2pkh(1), None)],
                0,
            )),
            ..Default::default()
        },
    ));
    indexer.fail_page(
        IndexerCall::NftOutputs,
        PAGE_SIZE,
        SourceError::Transport("reset".into()),
    );
    let explorer = Explorer::new(indexer, Arc::new(NullFetcher::new()), &config());
    assert!(matches!(
        explorer.lookup(&token).await,
        Err(LookupError::InvalidTokenId(_))
    ));
}

#[tokio::test]
async fn newer_submission_supersedes_the_slow_one() {
    let slow = fixtures::token_id(0x50);
    let fast = fixtures::token_id(0x51);
    let mut slow_fixture = fungible_fixture(slow, &[0; 32]);
    slow_fixture.delay = Some(Duration::from_millis(200));
    let indexer = Arc::new(
        NullIndexer::new()
            .with_token(slow, slow_fixture)
            .with_token(fast, fungible_fixture(fast, &[0; 32])),
    );
    let metrics = Arc::new(ExplorerMetrics::new());
    let explorer = Arc::new(
        Explorer::new(indexer, Arc::new(NullFetcher::new()), &config()).with_metrics(metrics.clone()),
    );
    let session = ExplorerSession::new(explorer);
    assert_eq!(session.status(), SessionStatus::Idle);

    let slow_hex = slow.to_hex();
    let fast_hex = fast.to_hex();
    let (first, second) = tokio::join!(session.submit(&slow_hex), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        session.submit(&fast_hex).await
    });

    assert_eq!(first.unwrap_err(), LookupError::Superseded);
    let report = second.unwrap();
    assert_eq!(report.overview.token_id, fast);
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.report().unwrap().overview.token_id, fast);
    assert_eq!(session.generation(), 2);
    assert_eq!(session.progress(), (true, true, true));
    assert_eq!(metrics.lookups_superseded.get(), 1);
}

#[tokio::test]
async fn failed_submission_is_recorded() {
    let explorer = Arc::new(Explorer::new(
        Arc::new(NullIndexer::new()),
        Arc::new(NullFetcher::new()),
        &config(),
    ));
    let session = ExplorerSession::new(explorer);
    assert!(session.submit("zz").await.is_err());
    assert_eq!(session.status(), SessionStatus::Failed);
    assert_eq!(
        session.error().as_deref(),
        Some("the input is not a valid token id")
    );
    assert!(session.report().is_none());
}
