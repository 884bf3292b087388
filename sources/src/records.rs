//! Normalized indexer records.
//!
//! Whatever shape the backing indexer answers with, implementations reduce it
//! to these before handing it to the engine: hashes without the `\x` display
//! prefix, amounts parsed, nested one-or-many shapes flattened.

use cashscope_types::{LockingBytecode, Timestamp, TxHash, UnspentOutput};
use serde::{Deserialize, Serialize};

/// The transaction that created a token category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisRecord {
    pub tx_hash: TxHash,
    /// Block inclusion time, `None` while unconfirmed.
    pub timestamp: Option<Timestamp>,
    /// Outputs of the genesis transaction carrying the new category.
    pub outputs: Vec<UnspentOutput>,
}

/// One transaction of the authchain, with the locking bytecode of every output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub tx_hash: TxHash,
    pub timestamp: Option<Timestamp>,
    pub outputs: Vec<LockingBytecode>,
}

/// The current authentication head.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeadRecord {
    pub tx_hash: TxHash,
    /// Output 0 of the head transaction, when still unspent.
    pub identity_output: Option<UnspentOutput>,
}

/// Authchain of a token as reported by the indexer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthchainRecord {
    /// Number of transactions in the chain as counted by the indexer.
    pub length: u64,
    pub head: AuthHeadRecord,
    /// Chain order: the authbase first, the head last.
    pub migrations: Vec<MigrationRecord>,
}
