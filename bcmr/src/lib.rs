//! BCMR: Bitcoin Cash Metadata Registry support.
//!
//! A registry is a JSON document listing identities, each with a history of
//! snapshots keyed by timestamp. Tokens commit to a registry on-chain by
//! publishing its SHA-256 and one or more URIs in their authchain.
//!
//! This crate handles:
//! - Parsing registries and extracting a token's identity snapshot
//! - Validating documents against the BCMR v2 shapes
//! - Turning declared URIs into fetchable HTTPS locations
//! - Decoding authchain publications into registry revisions
//! - Resolving, verifying and validating a token's current metadata

pub mod error;
pub mod location;
pub mod publications;
pub mod registry;
pub mod resolver;
pub mod schema;

pub use error::BcmrError;
pub use location::{gateway_url, icon_url, resolve_https_url};
pub use publications::publication_revisions;
pub use registry::{extract_document, Registry};
pub use resolver::{resolve_metadata, HashOutcome, Location, MetadataResolution, ResolverState};
pub use schema::{validate, SchemaKind, Validation};
