//! BCMR publication payloads.
//!
//! A publication output pushes, in order: the `BCMR` marker, the SHA-256 of
//! the registry document, then one or more URIs where the document lives.

use crate::error::ScriptError;
use crate::patterns::BCMR_MARKER;
use crate::push::decode_pushes;

/// Decoded `OP_RETURN <'BCMR'> <hash> <uri>...` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BcmrPayload {
    /// Segment 1, in the byte order it was pushed.
    pub content_hash: Option<Vec<u8>>,
    /// Segments 2.., UTF-8 decoded.
    pub uris: Vec<String>,
}

impl BcmrPayload {
    /// Parse a full locking script (starting with OP_RETURN).
    pub fn parse(script: &[u8]) -> Result<Self, ScriptError> {
        let segments = decode_pushes(script)?;
        Self::from_segments(segments)
    }

    pub fn from_segments(segments: Vec<Vec<u8>>) -> Result<Self, ScriptError> {
        let mut iter = segments.into_iter();
        match iter.next() {
            Some(marker) if marker == BCMR_MARKER => {}
            Some(other) => {
                return Err(ScriptError::NotBcmr(format!(
                    "first push is {} bytes, not the BCMR marker",
                    other.len()
                )))
            }
            None => return Err(ScriptError::NotBcmr("no pushes".into())),
        }

        let content_hash = iter.next();
        let uris = iter
            .map(|segment| String::from_utf8_lossy(&segment).into_owned())
            .collect();

        Ok(Self { content_hash, uris })
    }

    /// Lower-case hex of the committed hash, as pushed.
    pub fn content_hash_hex(&self) -> Option<String> {
        self.content_hash.as_ref().map(|bytes| {
            bytes.iter().map(|b| format!("{b:02x}")).collect()
        })
    }

    pub fn first_uri(&self) -> Option<&str> {
        self.uris.first().map(String::as_str)
    }
}

/// Human-readable rendering of publication segments: the marker as text, the
/// hash as a byte count and every following segment as UTF-8.
pub fn describe_segments(segments: &[Vec<u8>]) -> Vec<String> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| match i {
            1 => format!("<{} bytes>", segment.len()),
            _ => String::from_utf8_lossy(segment).into_owned(),
        })
        .collect()
}
