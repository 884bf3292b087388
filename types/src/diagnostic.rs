//! Diagnostics recorded while resolving off-chain metadata.
//!
//! Metadata failures never abort a lookup; each one is appended to an ordered
//! list that is returned next to whatever data was obtained.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What went wrong, grouped by the remedy an operator needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Transport failure: DNS, TLS, connection refused, CORS.
    FetchFailed,
    /// The host answered with a non-2xx status.
    HttpError,
    /// The payload is not JSON (for example an HTML challenge page).
    InvalidJson,
    /// The identity record violates the registry schema.
    SchemaInvalid,
    /// The document digest differs from the on-chain commitment.
    HashMismatch,
}

impl DiagnosticKind {
    pub const ALL: [Self; 5] = [
        Self::FetchFailed,
        Self::HttpError,
        Self::InvalidJson,
        Self::SchemaInvalid,
        Self::HashMismatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchFailed => "fetch_failed",
            Self::HttpError => "http_error",
            Self::InvalidJson => "invalid_json",
            Self::SchemaInvalid => "schema_invalid",
            Self::HashMismatch => "hash_mismatch",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated field of a schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    /// Dotted path to the offending field (`token.decimals`).
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Structured detail attached to a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticDetails {
    HttpStatus { status: u16 },
    HashMismatch { expected: String, actual: String },
    SchemaIssues { issues: Vec<SchemaIssue> },
}

/// A single entry in a lookup's diagnostic trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DiagnosticDetails>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: DiagnosticDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn fetch_failed(url: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            DiagnosticKind::FetchFailed,
            format!("could not reach {url}: {reason}"),
        )
    }

    pub fn http_error(url: &str, status: u16) -> Self {
        Self::new(
            DiagnosticKind::HttpError,
            format!("{url} answered with HTTP status {status}"),
        )
        .with_details(DiagnosticDetails::HttpStatus { status })
    }

    pub fn invalid_json(url: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            DiagnosticKind::InvalidJson,
            format!("{url} did not return a JSON registry: {reason}"),
        )
    }

    pub fn schema_invalid(issues: Vec<SchemaIssue>) -> Self {
        let summary = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(
            DiagnosticKind::SchemaInvalid,
            format!("metadata does not match the BCMR schema: {summary}"),
        )
        .with_details(DiagnosticDetails::SchemaIssues { issues })
    }

    pub fn hash_mismatch(expected: &str, actual: &str) -> Self {
        Self::new(
            DiagnosticKind::HashMismatch,
            format!("registry content hash {actual} differs from on-chain commitment {expected}"),
        )
        .with_details(DiagnosticDetails::HashMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
