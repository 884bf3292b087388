//! Pure supply computations.

use crate::SupplyError;
use cashscope_script::is_p2pkh;
use cashscope_types::{TokenAmount, UnspentOutput};
use std::collections::HashSet;

/// Sum of fungible amounts; outputs without tokens count as zero.
pub fn total_supply_ft(outputs: &[UnspentOutput]) -> Result<TokenAmount, SupplyError> {
    sum_amounts(outputs.iter())
}

/// Fungible units outside minting covenants, minus the reserved supply.
///
/// The result is signed: inconsistent indexer data can make it negative and
/// that is reported as-is.
pub fn circulating_supply_ft(
    outputs: &[UnspentOutput],
    reserved: TokenAmount,
) -> Result<i128, SupplyError> {
    let outside_minting = sum_amounts(outputs.iter().filter(|o| !o.is_minting()))?;
    outside_minting
        .signed_sub(reserved)
        .ok_or(SupplyError::Overflow)
}

/// `genesis - total`. Negative means the indexer reports more units than
/// were ever created.
pub fn burned_ft(genesis: TokenAmount, total: TokenAmount) -> Result<i128, SupplyError> {
    genesis.signed_sub(total).ok_or(SupplyError::Overflow)
}

fn sum_amounts<'a>(
    mut outputs: impl Iterator<Item = &'a UnspentOutput>,
) -> Result<TokenAmount, SupplyError> {
    outputs.try_fold(TokenAmount::ZERO, |acc, o| {
        acc.checked_add_output(o.amount_or_zero())
            .ok_or(SupplyError::Overflow)
    })
}

/// NFT-bearing outputs, split by capability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NftCount {
    pub total: u64,
    pub minting: u64,
}

pub fn count_nfts(outputs: &[UnspentOutput]) -> NftCount {
    outputs
        .iter()
        .filter(|o| o.has_nft())
        .fold(NftCount::default(), |mut count, o| {
            count.total += 1;
            if o.is_minting() {
                count.minting += 1;
            }
            count
        })
}

/// Distinct holders of a category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HolderCount {
    /// Distinct P2PKH locking bytecodes: individual users.
    pub number_holders: u64,
    /// Distinct locking bytecodes of any kind, contracts included.
    pub number_token_addresses: u64,
}

pub fn count_unique_holders(outputs: &[UnspentOutput]) -> HolderCount {
    let unique: HashSet<&[u8]> = outputs
        .iter()
        .map(|o| o.locking_bytecode.as_bytes())
        .collect();
    HolderCount {
        number_holders: unique.iter().filter(|lb| is_p2pkh(lb)).count() as u64,
        number_token_addresses: unique.len() as u64,
    }
}
