//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cashscope_explorer::LookupError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    /// The path segment is not 64 hex characters.
    #[error("{0}")]
    MalformedTokenId(String),

    /// Well-formed, but the indexer knows no such token (or failed).
    #[error("{0}")]
    TokenNotFound(String),

    #[error("metrics are disabled")]
    MetricsDisabled,

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedTokenId(_) => StatusCode::BAD_REQUEST,
            Self::TokenNotFound(_) | Self::MetricsDisabled => StatusCode::NOT_FOUND,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LookupError> for RpcError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Malformed(_) => Self::MalformedTokenId(e.to_string()),
            LookupError::InvalidTokenId(_) => Self::TokenNotFound(e.to_string()),
            LookupError::Superseded => Self::Server(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashscope_explorer::LookupCause;

    #[test]
    fn lookup_errors_map_to_status_codes() {
        let malformed = RpcError::from(LookupError::Malformed(
            cashscope_types::TypesError::InvalidLength {
                expected: 64,
                actual: 3,
            },
        ));
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let unknown = RpcError::from(LookupError::InvalidTokenId(LookupCause::NoGenesis));
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        assert_eq!(unknown.to_string(), "the input is not a valid token id");
    }
}
