//! Shared utilities for cashscope.

pub mod amount;
pub mod time;

pub use amount::{format_token_amount, group_thousands};
pub use time::{format_duration, format_timestamp};
