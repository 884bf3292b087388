//! Nullable infrastructure for deterministic testing.
//!
//! Both outside systems the engine talks to (the indexer and plain HTTP
//! hosts) are abstracted behind traits in `cashscope-sources`. This crate
//! provides test-friendly implementations that:
//! - Return scripted data, keyed by token id or URL
//! - Record every call so tests can assert on traffic
//! - Can fail on demand or answer after a delay
//! - Never touch the network
//!
//! Usage: swap the remote implementations for nullables in tests.

pub mod fetcher;
pub mod fixtures;
pub mod indexer;

pub use fetcher::NullFetcher;
pub use indexer::{IndexerCall, NullIndexer, TokenFixture};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock ignoring poisoning; a panicking test thread must not hide later assertions.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
