//! cashscope explorer: everything known about one CashToken category.
//!
//! The [`Explorer`] runs a lookup as three independent branches:
//! - Chain: genesis, holders, NFTs, minting tokens and the authchain,
//!   queried concurrently, all-or-nothing
//! - Metadata: the newest registry publication, fetched, validated and
//!   hash-checked; failures become diagnostics
//! - Trust: membership in the trust registry
//!
//! Branch results are merged into a [`TokenReport`] by a [`ReportBuilder`].
//! An [`ExplorerSession`] adds stale-response suppression on top for callers
//! that replace their query while one is in flight.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod session;

pub use config::ExplorerConfig;
pub use engine::{Branch, BranchSink, ChainFacts, Explorer, MetadataFacts};
pub use error::{ExplorerError, LookupCause, LookupError};
pub use logging::{init_logging, LogFormat};
pub use metrics::ExplorerMetrics;
pub use report::{MetadataReport, Overview, ReportBuilder, TokenReport};
pub use session::{ExplorerSession, SessionStatus};
