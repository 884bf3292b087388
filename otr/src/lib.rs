//! OTR: trust verification against a curated token registry.
//!
//! A token is "verified" when the trust registry lists an identity keyed by
//! its token id. The registry is fetched lazily, at most once per cache, and
//! every failure reads as "not verified".

pub mod cache;

pub use cache::TrustRegistryCache;

/// Open Token Registry location.
pub const DEFAULT_OTR_REGISTRY_URL: &str =
    "https://otr.cash/.well-known/bitcoin-cash-metadata-registry.json";
