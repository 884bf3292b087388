//! Unspent token outputs as reported by the indexer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bytecode::LockingBytecode;
use crate::error::TypesError;
use crate::hash::TxHash;

/// Non-fungible token capability of an output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NftCapability {
    /// Immutable NFT.
    None,
    /// NFT whose commitment can be changed by its owner.
    Mutable,
    /// Minting baton: may create new NFTs of the category.
    Minting,
}

impl NftCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mutable => "mutable",
            Self::Minting => "minting",
        }
    }
}

impl fmt::Display for NftCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NftCapability {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "mutable" => Ok(Self::Mutable),
            "minting" => Ok(Self::Minting),
            other => Err(TypesError::UnknownCapability(other.to_string())),
        }
    }
}

/// Reference to a transaction output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Outpoint {
    pub tx_hash: TxHash,
    pub index: u32,
}

/// One live UTXO holding units of a token category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    /// Where the output lives; used to deduplicate rows across pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outpoint: Option<Outpoint>,
    pub locking_bytecode: LockingBytecode,
    #[serde(default)]
    pub fungible_amount: Option<u64>,
    #[serde(default)]
    pub nft_capability: Option<NftCapability>,
}

impl UnspentOutput {
    /// A purely fungible output.
    pub fn fungible(locking_bytecode: LockingBytecode, amount: u64) -> Self {
        Self {
            outpoint: None,
            locking_bytecode,
            fungible_amount: Some(amount),
            nft_capability: None,
        }
    }

    /// An output carrying an NFT (and optionally fungible units).
    pub fn nft(locking_bytecode: LockingBytecode, capability: NftCapability) -> Self {
        Self {
            outpoint: None,
            locking_bytecode,
            fungible_amount: None,
            nft_capability: Some(capability),
        }
    }

    pub fn with_outpoint(mut self, tx_hash: TxHash, index: u32) -> Self {
        self.outpoint = Some(Outpoint { tx_hash, index });
        self
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.fungible_amount = Some(amount);
        self
    }

    /// Fungible amount, treating an absent value as zero.
    pub fn amount_or_zero(&self) -> u64 {
        self.fungible_amount.unwrap_or(0)
    }

    pub fn is_minting(&self) -> bool {
        self.nft_capability == Some(NftCapability::Minting)
    }

    pub fn has_nft(&self) -> bool {
        self.nft_capability.is_some()
    }
}
