//! Network-backed implementations of the cashscope data sources.
//!
//! - [`ChaingraphClient`]: the [`cashscope_sources::Indexer`] capability over
//!   a Chaingraph GraphQL endpoint
//! - [`ReqwestFetcher`]: the [`cashscope_sources::HttpFetch`] capability

pub mod chaingraph;
pub mod fetcher;
pub mod queries;
mod wire;

pub use chaingraph::ChaingraphClient;
pub use fetcher::ReqwestFetcher;
