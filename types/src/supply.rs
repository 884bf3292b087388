//! Supply snapshot of a token category.

use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;

/// Point-in-time supply figures derived from the current UTXO set.
///
/// Recomputed on every query and never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSupplySnapshot {
    /// Fungible units created in the genesis transaction.
    pub genesis_supply_ft: TokenAmount,
    /// Fungible units across all unspent outputs.
    pub total_supply_ft: TokenAmount,
    /// Total minus minting covenants minus the reserved supply. May be
    /// negative when the indexer data is inconsistent.
    pub circulating_supply_ft: i128,
    /// Fungible units held by the authentication head identity output.
    pub reserved_supply_ft: TokenAmount,
    /// `genesis - total`. Negative values indicate inconsistent data.
    pub burned_ft: i128,
    pub total_supply_nfts: u64,
    pub minting_nfts: u64,
    pub has_active_minting_token: bool,
    /// Distinct pay-to-public-key-hash holders.
    pub number_holders: u64,
    /// Distinct locking bytecodes, including contracts.
    pub number_token_addresses: u64,
}

impl TokenSupplySnapshot {
    pub fn token_kind(&self) -> TokenKind {
        TokenKind::classify(!self.genesis_supply_ft.is_zero(), self.total_supply_nfts > 0)
    }

    /// Whether `burned_ft` points at inconsistent data rather than a burn.
    pub fn has_burn_anomaly(&self) -> bool {
        self.burned_ft < 0
    }
}

/// What a category carries, as far as the explorer can tell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Fungible,
    NonFungible,
    Both,
    Unknown,
}

impl TokenKind {
    pub fn classify(has_fungible: bool, has_nfts: bool) -> Self {
        match (has_fungible, has_nfts) {
            (true, false) => Self::Fungible,
            (false, true) => Self::NonFungible,
            (true, true) => Self::Both,
            (false, false) => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fungible => "Fungible Token",
            Self::NonFungible => "NFTs",
            Self::Both => "Both Fungible & Non-Fungible tokens",
            Self::Unknown => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_all_cases() {
        assert_eq!(TokenKind::classify(true, false), TokenKind::Fungible);
        assert_eq!(TokenKind::classify(false, true), TokenKind::NonFungible);
        assert_eq!(TokenKind::classify(true, true), TokenKind::Both);
        assert_eq!(TokenKind::classify(false, false), TokenKind::Unknown);
    }

    #[test]
    fn negative_burn_is_an_anomaly() {
        let snapshot = TokenSupplySnapshot {
            burned_ft: -5,
            ..Default::default()
        };
        assert!(snapshot.has_burn_anomaly());
    }
}
