use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BcmrError {
    #[error("registry is not valid JSON: {0}")]
    Json(String),

    #[error("registry root is not an object")]
    NotAnObject,
}
