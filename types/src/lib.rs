//! Fundamental types for cashscope.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! token ids, transaction hashes, token amounts, unspent outputs, authchain entries,
//! supply snapshots, registry metadata and diagnostics.

pub mod amount;
pub mod authchain;
pub mod bytecode;
pub mod diagnostic;
pub mod error;
pub mod hash;
pub mod metadata;
pub mod network;
pub mod output;
pub mod supply;
pub mod time;

pub use amount::TokenAmount;
pub use authchain::AuthchainEntry;
pub use bytecode::LockingBytecode;
pub use diagnostic::{Diagnostic, DiagnosticDetails, DiagnosticKind, SchemaIssue};
pub use error::TypesError;
pub use hash::{TokenId, TxHash};
pub use metadata::{
    MetadataDocument, NftCategory, NftField, NftFieldEncoding, NftParse, NftType, TokenCategoryInfo,
    Uris,
};
pub use network::Network;
pub use output::{NftCapability, Outpoint, UnspentOutput};
pub use supply::{TokenKind, TokenSupplySnapshot};
pub use time::Timestamp;
