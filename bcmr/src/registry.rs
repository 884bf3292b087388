//! Registry documents and identity lookup.

use crate::BcmrError;
use cashscope_types::{MetadataDocument, TokenCategoryInfo, TokenId, Uris};
use serde_json::{Map, Value};

/// A parsed registry file.
///
/// The raw JSON is kept so that schema validation can report on exactly what
/// the publisher wrote.
#[derive(Clone, Debug, PartialEq)]
pub struct Registry {
    root: Value,
}

impl Registry {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BcmrError> {
        let root: Value =
            serde_json::from_slice(bytes).map_err(|e| BcmrError::Json(e.to_string()))?;
        Self::from_value(root)
    }

    pub fn from_value(root: Value) -> Result<Self, BcmrError> {
        if !root.is_object() {
            return Err(BcmrError::NotAnObject);
        }
        Ok(Self { root })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    fn identities(&self) -> Option<&Map<String, Value>> {
        self.root.get("identities")?.as_object()
    }

    /// Snapshot history of the identity describing `token`.
    ///
    /// Identities are keyed by authbase, which for most tokens is the token
    /// id itself. Otherwise the identity whose newest snapshot names the
    /// token as its category is used.
    pub fn identity_history(&self, token: &TokenId) -> Option<&Map<String, Value>> {
        let identities = self.identities()?;
        let hex = token.to_hex();
        if let Some(history) = identities.get(&hex).and_then(Value::as_object) {
            return Some(history);
        }
        identities
            .values()
            .filter_map(Value::as_object)
            .find(|history| {
                latest_in(history)
                    .and_then(|s| s.get("token"))
                    .and_then(|t| t.get("category"))
                    .and_then(Value::as_str)
                    .is_some_and(|c| c.eq_ignore_ascii_case(&hex))
            })
    }

    /// The newest snapshot of the identity describing `token`.
    pub fn latest_snapshot(&self, token: &TokenId) -> Option<&Value> {
        latest_in(self.identity_history(token)?)
    }

    pub fn has_identity(&self, token: &TokenId) -> bool {
        self.identity_history(token).is_some()
    }
}

// Snapshot keys are ISO-8601 timestamps, which sort lexicographically.
fn latest_in(history: &Map<String, Value>) -> Option<&Value> {
    history
        .iter()
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, snapshot)| snapshot)
}

/// Read a snapshot into a [`MetadataDocument`], keeping whatever is usable.
///
/// A snapshot that fails strict deserialization (a number where a string
/// belongs, decimals out of range) is read field by field instead, dropping
/// only the fields of the wrong type.
pub fn extract_document(snapshot: &Value) -> MetadataDocument {
    if let Ok(document) = serde_json::from_value::<MetadataDocument>(snapshot.clone()) {
        return document;
    }

    let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
    let Some(object) = snapshot.as_object() else {
        return MetadataDocument::default();
    };

    let uris: Uris = object
        .get("uris")
        .and_then(Value::as_object)
        .map(|uris| {
            uris.iter()
                .filter_map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default();

    let token = object.get("token").and_then(Value::as_object).map(|token| {
        TokenCategoryInfo {
            category: text(token.get("category")),
            symbol: text(token.get("symbol")).unwrap_or_default(),
            decimals: token
                .get("decimals")
                .and_then(Value::as_u64)
                .and_then(|d| u8::try_from(d).ok()),
            nfts: token
                .get("nfts")
                .and_then(|n| serde_json::from_value(n.clone()).ok()),
        }
    });

    MetadataDocument {
        name: text(object.get("name")).unwrap_or_default(),
        description: text(object.get("description")),
        token,
        uris,
        status: text(object.get("status")),
        tags: object
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(|t| text(Some(t))).collect())
            .unwrap_or_default(),
        split_id: text(object.get("splitId")),
        migrated: text(object.get("migrated")),
        extensions: object.get("extensions").cloned(),
    }
}
