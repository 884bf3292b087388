//! Transaction hash and token id types.
//!
//! Hashes are kept in display (RPC) byte order, which is the order chaingraph
//! uses for `bytea` columns and the order users paste into the explorer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Prefix chaingraph puts in front of every `bytea` value.
pub const BYTEA_PREFIX: &str = "\\x";

/// Strip the chaingraph `\x` display prefix, if present.
pub fn strip_bytea_prefix(s: &str) -> &str {
    s.strip_prefix(BYTEA_PREFIX).unwrap_or(s)
}

/// A 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a hex hash, tolerating the `\x` prefix and upper-case digits.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let trimmed = strip_bytea_prefix(s.trim());
        if trimmed.len() != 64 {
            return Err(TypesError::InvalidLength {
                expected: 64,
                actual: trimmed.len(),
            });
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(trimmed, &mut bytes)
            .map_err(|e| TypesError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for TxHash {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a token category: the hash of its genesis transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(TxHash);

impl TokenId {
    pub fn new(genesis_tx: TxHash) -> Self {
        Self(genesis_tx)
    }

    /// Parse user input into a token id.
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        TxHash::from_hex(s).map(Self)
    }

    /// The genesis transaction hash this category was created in.
    pub fn genesis_tx(&self) -> TxHash {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TokenId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TxHash> for TokenId {
    fn from(hash: TxHash) -> Self {
        Self(hash)
    }
}
