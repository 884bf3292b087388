//! Supply-specific errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SupplyError {
    #[error("arithmetic overflow in supply computation")]
    Overflow,
}
