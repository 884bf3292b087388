use thiserror::Error;

/// Failure talking to the indexer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("indexer unreachable: {0}")]
    Transport(String),

    #[error("indexer returned HTTP status {0}")]
    Status(u16),

    #[error("indexer reported errors: {0}")]
    Query(String),

    #[error("malformed indexer response: {0}")]
    Malformed(String),

    #[error("page at offset {offset} failed: {source}")]
    Page {
        offset: usize,
        #[source]
        source: Box<SourceError>,
    },
}

/// Failure fetching a document over HTTP. Only transport-level problems are
/// errors; any status code is a successful fetch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid url {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Transport(String),
}
