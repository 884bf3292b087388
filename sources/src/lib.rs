//! Abstract data sources for cashscope.
//!
//! The engine talks to exactly two outside systems: a blockchain indexer and
//! plain HTTP hosts serving registry documents. Both sit behind the traits in
//! this crate. `cashscope-remote` implements them against chaingraph and
//! reqwest; `cashscope-nullables` implements them in memory for tests.

pub mod error;
pub mod fetch;
pub mod indexer;
pub mod pagination;
pub mod records;

pub use error::{FetchError, SourceError};
pub use fetch::{FetchResponse, HttpFetch};
pub use indexer::Indexer;
pub use pagination::{collect_pages, Paginated, PAGE_SIZE};
pub use records::{AuthHeadRecord, AuthchainRecord, GenesisRecord, MigrationRecord};
