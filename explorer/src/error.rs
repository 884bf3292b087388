use cashscope_authchain::AuthchainError;
use cashscope_sources::SourceError;
use cashscope_supply::SupplyError;
use cashscope_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Why a lookup produced no report.
///
/// Every chain-side failure reads the same to the user; the detailed cause
/// stays in the source chain for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("the input is not a valid token id")]
    Malformed(#[source] TypesError),

    #[error("the input is not a valid token id")]
    InvalidTokenId(#[source] LookupCause),

    #[error("lookup superseded by a newer request")]
    Superseded,
}

impl LookupError {
    /// Whether the input could not even be parsed as a token id.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupCause {
    #[error("no genesis transaction for this token id")]
    NoGenesis,

    #[error(transparent)]
    Indexer(#[from] SourceError),

    #[error(transparent)]
    Authchain(#[from] AuthchainError),

    #[error(transparent)]
    Supply(#[from] SupplyError),
}

impl From<LookupCause> for LookupError {
    fn from(cause: LookupCause) -> Self {
        Self::InvalidTokenId(cause)
    }
}

impl From<SourceError> for LookupError {
    fn from(e: SourceError) -> Self {
        Self::InvalidTokenId(e.into())
    }
}
