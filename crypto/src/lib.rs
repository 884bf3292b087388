//! Hashing and address encoding for cashscope.
//!
//! - **SHA-256** for registry content-hash verification
//! - **CashAddress** encoding of P2PKH / P2SH locking bytecode

pub mod address;
pub mod hash;

pub use address::{
    decode_cash_address, encode_cash_address, locking_bytecode_address, AddressError,
    AddressKind, CashAddress,
};
pub use hash::{sha256, sha256_hex};
