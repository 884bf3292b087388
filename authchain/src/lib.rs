//! Authchain engine.
//!
//! A token's authchain is the sequence of transactions that spent output 0
//! of the previous one, starting at the token id. Transactions that also
//! carry a `6a0442434d52` output publish a new metadata registry location.
//!
//! This crate handles:
//! - Walking the chain from the indexer into an ordered timeline
//! - Facts about the authentication head (address, AuthGuard, last update)
//! - Merging registry-side revision history into the timeline
//! - Decoding the newest publication for display

pub mod error;
pub mod latest;
pub mod reconcile;
pub mod walker;

pub use error::AuthchainError;
pub use latest::{latest_publication, LatestPublication};
pub use reconcile::{base_domain, cross_check_domains, merge_timeline, RegistryRevision};
pub use walker::{build_authchain, walk_authchain, AuthHead, WalkedAuthchain};
