//! Supply calculator: token accounting over a raw UTXO set.
//!
//! Everything here is a pure function of the outputs the indexer returned:
//! `total = Σ fungible_amount`, `circulating = Σ non-minting − reserved`,
//! `burned = genesis − total`.
//!
//! This crate handles:
//! - Exact fungible sums (u128, overflow is an error)
//! - Minting-covenant exclusion from circulating supply
//! - NFT and minting-token counts
//! - Unique holder counting by locking bytecode
//! - Assembling a [`cashscope_types::TokenSupplySnapshot`]

pub mod calculator;
pub mod error;
pub mod snapshot;

pub use calculator::{
    burned_ft, circulating_supply_ft, count_nfts, count_unique_holders, total_supply_ft,
    HolderCount, NftCount,
};
pub use error::SupplyError;
pub use snapshot::{build_snapshot, reserved_supply_ft, SupplyInputs};
