//! Authchain-specific errors.

use cashscope_script::ScriptError;
use cashscope_sources::SourceError;
use cashscope_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthchainError {
    #[error("indexer query failed")]
    Source(#[from] SourceError),

    #[error("indexer has no authchain for this token")]
    NotFound,

    #[error("authchain does not contain the token id transaction")]
    GenesisNotInChain,

    #[error("indexer head {head} is not the last migration {last}")]
    HeadMismatch { head: TxHash, last: TxHash },

    #[error("publication payload could not be decoded")]
    Payload(#[from] ScriptError),
}
