//! Walking the authchain from indexer records into a timeline.

use crate::AuthchainError;
use cashscope_crypto::locking_bytecode_address;
use cashscope_script::{is_bcmr_publication, uses_auth_guard};
use cashscope_sources::{AuthchainRecord, Indexer};
use cashscope_types::{AuthchainEntry, LockingBytecode, Network, TokenId, TxHash, UnspentOutput};
use serde::{Deserialize, Serialize};

/// Facts about the current authentication head.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHead {
    pub tx_hash: TxHash,
    /// Whether the head transaction itself published metadata.
    pub is_metadata_update: bool,
    /// CashAddress of the identity output, for P2PKH and P2SH scripts.
    pub address: Option<String>,
    /// Identity output locked behind the AuthGuard script-hash template.
    pub uses_auth_guard: bool,
}

/// The authchain of one token, genesis first, head last.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkedAuthchain {
    pub entries: Vec<AuthchainEntry>,
    pub head: AuthHead,
    /// Chain length as counted by the indexer.
    pub length: u64,
    /// Identity output of the head, when unspent.
    pub identity_output: Option<UnspentOutput>,
}

impl WalkedAuthchain {
    /// Number of metadata publications in the timeline.
    pub fn metadata_updates(&self) -> usize {
        self.entries.iter().filter(|e| e.is_metadata_update).count()
    }
}

/// Query the indexer and build the token's authchain.
pub async fn walk_authchain(
    indexer: &dyn Indexer,
    token: &TokenId,
    network: Network,
) -> Result<WalkedAuthchain, AuthchainError> {
    let record = indexer
        .authchain(token)
        .await?
        .ok_or(AuthchainError::NotFound)?;
    build_authchain(token, record, network)
}

/// Turn an indexer authchain record into a timeline.
///
/// Transactions before the token id (funding the genesis input) are
/// dropped. Every remaining migration becomes one entry carrying its first
/// publication output, if any. The last entry must be the indexer's head.
pub fn build_authchain(
    token: &TokenId,
    record: AuthchainRecord,
    network: Network,
) -> Result<WalkedAuthchain, AuthchainError> {
    let genesis = token.genesis_tx();
    let start = record
        .migrations
        .iter()
        .position(|m| m.tx_hash == genesis)
        .ok_or(AuthchainError::GenesisNotInChain)?;
    if start > 0 {
        tracing::debug!(%token, dropped = start, "skipping transactions before genesis");
    }

    let mut head_identity: Option<LockingBytecode> = None;
    let mut entries: Vec<AuthchainEntry> = Vec::with_capacity(record.migrations.len() - start);
    for migration in record.migrations.into_iter().skip(start) {
        let publication = migration
            .outputs
            .iter()
            .find(|lb| is_bcmr_publication(lb.as_bytes()))
            .cloned();
        head_identity = migration.outputs.first().cloned();
        entries.push(AuthchainEntry::on_chain(
            migration.tx_hash,
            migration.timestamp,
            publication,
        ));
    }

    // Non-empty: the genesis position was found above.
    let last = entries.len() - 1;
    if entries[last].tx_hash != record.head.tx_hash {
        return Err(AuthchainError::HeadMismatch {
            head: record.head.tx_hash,
            last: entries[last].tx_hash,
        });
    }
    entries[0].is_genesis = true;
    entries[last].is_auth_head = true;

    let identity_bytecode = record
        .head
        .identity_output
        .as_ref()
        .map(|o| o.locking_bytecode.clone())
        .or(head_identity);
    let head = AuthHead {
        tx_hash: record.head.tx_hash,
        is_metadata_update: entries[last].is_metadata_update,
        address: identity_bytecode
            .as_ref()
            .and_then(|lb| locking_bytecode_address(network, lb.as_bytes())),
        uses_auth_guard: identity_bytecode
            .as_ref()
            .is_some_and(|lb| uses_auth_guard(lb.as_bytes())),
    };

    tracing::debug!(
        %token,
        entries = entries.len(),
        head = %head.tx_hash,
        "authchain walked"
    );

    Ok(WalkedAuthchain {
        entries,
        head,
        length: record.length,
        identity_output: record.head.identity_output,
    })
}
