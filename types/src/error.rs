//! Parse errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid token amount: {0}")]
    InvalidAmount(String),

    #[error("unknown NFT capability: {0}")]
    UnknownCapability(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
