//! Indexer capability.

use crate::records::{AuthchainRecord, GenesisRecord};
use crate::SourceError;
use async_trait::async_trait;
use cashscope_types::{TokenId, UnspentOutput};

/// Point-in-time queries against a UTXO/transaction index.
///
/// Paginated queries return at most [`crate::PAGE_SIZE`] rows starting at
/// `offset`; callers use [`crate::collect_pages`] to read every page.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// The transaction spending `<token>:0`, with its outputs of this category.
    /// `None` when no such transaction exists.
    async fn genesis(&self, token: &TokenId) -> Result<Option<GenesisRecord>, SourceError>;

    /// Unspent outputs of the category (fungible and NFT alike).
    async fn token_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError>;

    /// Unspent outputs of the category that carry an NFT.
    async fn nft_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError>;

    /// Unspent minting-capability outputs of the category.
    async fn minting_outputs(
        &self,
        token: &TokenId,
        offset: usize,
    ) -> Result<Vec<UnspentOutput>, SourceError>;

    /// Authentication chain rooted at the token's genesis transaction.
    async fn authchain(&self, token: &TokenId) -> Result<Option<AuthchainRecord>, SourceError>;
}
