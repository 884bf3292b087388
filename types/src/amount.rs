//! Fungible token amount type.
//!
//! A single CashToken output carries at most 2^63 - 1 fungible units, but sums
//! across many outputs can exceed that, so aggregates are held in `u128` and
//! only ever combined with checked arithmetic. Amounts serialize as decimal
//! strings so JSON consumers never round them through a float.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Largest fungible amount a single output may carry.
pub const MAX_OUTPUT_AMOUNT: u64 = i64::MAX as u64;

/// An aggregate fungible token amount, in raw (undivided) units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_add_output(self, amount: u64) -> Option<Self> {
        self.0.checked_add(u128::from(amount)).map(Self)
    }

    /// Signed difference `self - other`. Both operands fit in `i128` for any
    /// realistic supply, so the conversion only fails on corrupted data.
    pub fn signed_sub(self, other: Self) -> Option<i128> {
        let a = i128::try_from(self.0).ok()?;
        let b = i128::try_from(other.0).ok()?;
        a.checked_sub(b)
    }
}

impl From<u64> for TokenAmount {
    fn from(raw: u64) -> Self {
        Self(u128::from(raw))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenAmount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u128>()
            .map(Self)
            .map_err(|e| TypesError::InvalidAmount(format!("{s:?}: {e}")))
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a single output's fungible amount as chaingraph reports it (a
/// `bigint` rendered as a decimal string).
pub fn parse_output_amount(s: &str) -> Result<u64, TypesError> {
    let value = s
        .trim()
        .parse::<u64>()
        .map_err(|e| TypesError::InvalidAmount(format!("{s:?}: {e}")))?;
    if value > MAX_OUTPUT_AMOUNT {
        return Err(TypesError::InvalidAmount(format!(
            "{value} exceeds the per-output maximum"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_add_output_accumulates() {
        let total = TokenAmount::ZERO
            .checked_add_output(MAX_OUTPUT_AMOUNT)
            .and_then(|t| t.checked_add_output(MAX_OUTPUT_AMOUNT))
            .unwrap();
        assert_eq!(total.raw(), 2 * u128::from(MAX_OUTPUT_AMOUNT));
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert!(TokenAmount::new(u128::MAX).checked_add_output(1).is_none());
    }

    #[test]
    fn signed_sub_goes_negative() {
        let a = TokenAmount::new(10);
        let b = TokenAmount::new(25);
        assert_eq!(a.signed_sub(b), Some(-15));
    }

    #[test]
    fn parse_output_amount_rejects_above_max() {
        assert!(parse_output_amount("9223372036854775807").is_ok());
        assert!(parse_output_amount("9223372036854775808").is_err());
        assert!(parse_output_amount("-1").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&TokenAmount::new(1_000_000)).unwrap();
        assert_eq!(json, "\"1000000\"");
    }
}
