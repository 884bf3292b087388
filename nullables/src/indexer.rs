//! Nullable indexer: scripted token data served with real page semantics.

use crate::lock;
use async_trait::async_trait;
use cashscope_sources::{AuthchainRecord, GenesisRecord, Indexer, SourceError, PAGE_SIZE};
use cashscope_types::{TokenId, UnspentOutput};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Which indexer query was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexerCall {
    Genesis,
    TokenOutputs,
    NftOutputs,
    MintingOutputs,
    Authchain,
}

/// Everything the indexer knows about one token.
#[derive(Clone, Debug, Default)]
pub struct TokenFixture {
    pub genesis: Option<GenesisRecord>,
    pub token_outputs: Vec<UnspentOutput>,
    pub nft_outputs: Vec<UnspentOutput>,
    pub minting_outputs: Vec<UnspentOutput>,
    pub authchain: Option<AuthchainRecord>,
    /// Applied before every answer about this token.
    pub delay: Option<Duration>,
}

/// A test indexer that answers from in-memory fixtures.
///
/// Unknown tokens behave like ids with no genesis transaction. Paginated
/// queries return `PAGE_SIZE` rows per offset, exactly like the real service.
#[derive(Default)]
pub struct NullIndexer {
    tokens: Mutex<HashMap<TokenId, TokenFixture>>,
    failures: Mutex<HashMap<(IndexerCall, Option<usize>), SourceError>>,
    calls: Mutex<Vec<(IndexerCall, TokenId, usize)>>,
}

impl NullIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the fixture for a token.
    pub fn insert(&self, token: TokenId, fixture: TokenFixture) {
        lock(&self.tokens).insert(token, fixture);
    }

    pub fn with_token(self, token: TokenId, fixture: TokenFixture) -> Self {
        self.insert(token, fixture);
        self
    }

    /// Make every call of this kind fail.
    pub fn fail(&self, call: IndexerCall, error: SourceError) {
        lock(&self.failures).insert((call, None), error);
    }

    /// Make only the page at `offset` of a paginated call fail.
    pub fn fail_page(&self, call: IndexerCall, offset: usize, error: SourceError) {
        lock(&self.failures).insert((call, Some(offset)), error);
    }

    /// All calls so far, in order: `(call, token, offset)`.
    pub fn calls(&self) -> Vec<(IndexerCall, TokenId, usize)> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, call: IndexerCall) -> usize {
        lock(&self.calls).iter().filter(|(c, _, _)| *c == call).count()
    }

    /// Clear recorded calls.
    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }

    async fn answer<T>(
        &self,
        call: IndexerCall,
        token: &TokenId,
        offset: usize,
        pick: impl FnOnce(&TokenFixture) -> T,
    ) -> Result<T, SourceError> {
        lock(&self.calls).push((call, *token, offset));

        let (delay, value) = {
            let tokens = lock(&self.tokens);
            match tokens.get(token) {
                Some(fixture) => (fixture.delay, pick(fixture)),
                None => (None, pick(&TokenFixture::default())),
            }
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failures = lock(&self.failures);
        if let Some(err) = failures
            .get(&(call, Some(offset)))
            .or_else(|| failures.get(&(call, None)))
        {
            return Err(err.clone());
        }
        Ok(value)
    }
}

fn page(rows: &[UnspentOutput], offset: usize) -> Vec<UnspentOutput> {
    rows.iter().skip(offset).take(PAGE_SIZE).cloned().collect()
}

#[async_trait]
impl Indexer for NullIndexer {
    async fn genesis(&self, token: &TokenId) -> Result<Option<GenesisRecord>, SourceError> {
        self.answer(IndexerCall::Genesis, token, 0, |f| f.genesis.clone())
            .await
    }

    async fn token_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError> {
        self.answer(IndexerCall::TokenOutputs, token, offset, |f| {
            page(&f.token_outputs, offset)
        })
        .await
    }

    async fn nft_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError> {
        self.answer(IndexerCall::NftOutputs, token, offset, |f| {
            page(&f.nft_outputs, offset)
        })
        .await
    }

    async fn minting_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError> {
        self.answer(IndexerCall::MintingOutputs, token, offset, |f| {
            page(&f.minting_outputs, offset)
        })
        .await
    }

    async fn authchain(&self, token: &TokenId) -> Result<Option<AuthchainRecord>, SourceError> {
        self.answer(IndexerCall::Authchain, token, 0, |f| f.authchain.clone())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use cashscope_sources::collect_pages;

    #[tokio::test]
    async fn unknown_token_has_no_genesis() {
        let indexer = NullIndexer::new();
        assert_eq!(indexer.genesis(&fixtures::token_id(1)).await.unwrap(), None);
        assert_eq!(indexer.call_count(IndexerCall::Genesis), 1);
    }

    #[tokio::test]
    async fn serves_real_pages() {
        let token = fixtures::token_id(2);
        let indexer = NullIndexer::new().with_token(
            token,
            TokenFixture {
                nft_outputs: fixtures::nft_outputs(PAGE_SIZE + 3),
                ..Default::default()
            },
        );
        let all = collect_pages(|offset| indexer.nft_outputs(&token, offset))
            .await
            .unwrap();
        assert_eq!(all.rows.len(), PAGE_SIZE + 3);
        let offsets: Vec<usize> = indexer.calls().iter().map(|(_, _, o)| *o).collect();
        assert_eq!(offsets, vec![0, PAGE_SIZE]);
    }

    #[tokio::test]
    async fn injected_page_failure() {
        let token = fixtures::token_id(3);
        let indexer = NullIndexer::new().with_token(
            token,
            TokenFixture {
                token_outputs: fixtures::nft_outputs(PAGE_SIZE),
                ..Default::default()
            },
        );
        indexer.fail_page(
            IndexerCall::TokenOutputs,
            PAGE_SIZE,
            SourceError::Transport("reset".into()),
        );
        assert!(indexer.token_outputs(&token, 0).await.is_ok());
        assert!(indexer.token_outputs(&token, PAGE_SIZE).await.is_err());
    }
}
