//! Authentication-chain entries ("migrations").

use serde::{Deserialize, Serialize};

use crate::bytecode::LockingBytecode;
use crate::hash::TxHash;
use crate::time::Timestamp;

/// One step in a token's authentication chain.
///
/// Entries are produced by the authchain walker from on-chain data and are
/// only ever enriched afterwards with registry-side data carrying the same
/// `tx_hash`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthchainEntry {
    pub tx_hash: TxHash,
    /// Block timestamp; `None` while the transaction is unconfirmed.
    pub timestamp: Option<Timestamp>,
    /// Whether this transaction publishes a BCMR metadata location.
    pub is_metadata_update: bool,
    /// Content hash committed in the publication, hex encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// Fetchable HTTPS location of the published registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_url: Option<String>,
    /// Declared URIs of the published registry, in push order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<String>,
    /// Full OP_RETURN locking bytecode carrying the publication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_return: Option<LockingBytecode>,
    /// Set on the entry equal to the genesis transaction.
    #[serde(default)]
    pub is_genesis: bool,
    /// Set on the entry equal to the current authentication head.
    #[serde(default)]
    pub is_auth_head: bool,
}

impl AuthchainEntry {
    /// An entry built from on-chain data only.
    pub fn on_chain(
        tx_hash: TxHash,
        timestamp: Option<Timestamp>,
        op_return: Option<LockingBytecode>,
    ) -> Self {
        Self {
            tx_hash,
            timestamp,
            is_metadata_update: op_return.is_some(),
            content_hash: None,
            https_url: None,
            uris: Vec::new(),
            op_return,
            is_genesis: false,
            is_auth_head: false,
        }
    }

    /// Whether this entry only moved the identity output without publishing metadata.
    pub fn is_identity_transfer(&self) -> bool {
        !self.is_metadata_update
    }
}
