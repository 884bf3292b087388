//! Assembling a supply snapshot from the indexer's answers.

use crate::calculator::{
    burned_ft, circulating_supply_ft, count_nfts, count_unique_holders, total_supply_ft,
};
use crate::SupplyError;
use cashscope_types::{TokenAmount, TokenSupplySnapshot, UnspentOutput};

/// Everything the indexer returned for one category, pages already joined.
#[derive(Clone, Copy, Debug)]
pub struct SupplyInputs<'a> {
    /// Outputs of the genesis transaction carrying the category.
    pub genesis_outputs: &'a [UnspentOutput],
    /// Every unspent output of the category.
    pub token_outputs: &'a [UnspentOutput],
    /// Every unspent NFT output of the category.
    pub nft_outputs: &'a [UnspentOutput],
    /// Unspent minting NFTs.
    pub minting_outputs: &'a [UnspentOutput],
    /// Fungible units on the authentication head's identity output.
    pub reserved: TokenAmount,
}

/// Fungible units held by the identity output, zero when it is spent or absent.
pub fn reserved_supply_ft(identity_output: Option<&UnspentOutput>) -> TokenAmount {
    identity_output
        .map(|o| TokenAmount::from(o.amount_or_zero()))
        .unwrap_or(TokenAmount::ZERO)
}

/// Compute every supply figure for a category.
///
/// Holders are counted over all token outputs for categories that minted
/// fungible units at genesis, and over the NFT outputs otherwise.
pub fn build_snapshot(inputs: SupplyInputs<'_>) -> Result<TokenSupplySnapshot, SupplyError> {
    let genesis_supply_ft = total_supply_ft(inputs.genesis_outputs)?;
    let total_supply_ft = total_supply_ft(inputs.token_outputs)?;
    let circulating_supply_ft = circulating_supply_ft(inputs.token_outputs, inputs.reserved)?;
    let burned_ft = burned_ft(genesis_supply_ft, total_supply_ft)?;

    let nfts = count_nfts(inputs.nft_outputs);
    let minting_nfts = inputs.minting_outputs.len() as u64;

    let holder_source = if genesis_supply_ft.is_zero() {
        inputs.nft_outputs
    } else {
        inputs.token_outputs
    };
    let holders = count_unique_holders(holder_source);

    Ok(TokenSupplySnapshot {
        genesis_supply_ft,
        total_supply_ft,
        circulating_supply_ft,
        reserved_supply_ft: inputs.reserved,
        burned_ft,
        total_supply_nfts: nfts.total,
        minting_nfts,
        has_active_minting_token: minting_nfts > 0,
        number_holders: holders.number_holders,
        number_token_addresses: holders.number_token_addresses,
    })
}
