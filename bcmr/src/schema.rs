//! BCMR v2 structural validation.
//!
//! Validation works on raw JSON so that every violated field is reported
//! with its dotted path, not only the first one serde trips over. Unknown
//! keys are accepted.

use cashscope_types::SchemaIssue;
use serde::Serialize;
use serde_json::{Map, Value};

const MAX_DECIMALS: u64 = 18;
const STATUSES: [&str; 3] = ["active", "burned", "inactive"];
const FIELD_ENCODINGS: [&str; 8] = [
    "binary", "boolean", "hex", "https-url", "ipfs-cid", "utf8", "locktime", "number",
];

/// Document shapes that can be validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SchemaKind {
    /// A complete registry file.
    Registry,
    /// One snapshot from an identity's history.
    IdentitySnapshot,
    /// The `token` section of a snapshot.
    TokenCategory,
    /// The `token.nfts` section of a snapshot.
    NftCategory,
    /// The flat token metadata shape used by older publishers.
    TokenMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub issues: Vec<SchemaIssue>,
}

/// Check `value` against the shape `kind`.
pub fn validate(value: &Value, kind: SchemaKind) -> Validation {
    let mut checker = Checker::default();
    match kind {
        SchemaKind::Registry => checker.registry(value),
        SchemaKind::IdentitySnapshot => checker.identity_snapshot(value, ""),
        SchemaKind::TokenCategory => checker.token_category(value, ""),
        SchemaKind::NftCategory => checker.nft_category(value, ""),
        SchemaKind::TokenMetadata => checker.token_metadata(value),
    }
    Validation {
        valid: checker.issues.is_empty(),
        issues: checker.issues,
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

#[derive(Default)]
struct Checker {
    issues: Vec<SchemaIssue>,
}

impl Checker {
    fn issue(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(SchemaIssue {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.issue(path, "expected an object");
        }
        object
    }

    fn required<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'a Value> {
        let value = object.get(key);
        if value.is_none() {
            self.issue(&join(path, key), "required");
        }
        value
    }

    fn string(&mut self, value: &Value, path: &str) {
        if !value.is_string() {
            self.issue(path, "expected a string");
        }
    }

    fn required_string(&mut self, object: &Map<String, Value>, key: &str, path: &str) {
        if let Some(value) = self.required(object, key, path) {
            self.string(value, &join(path, key));
        }
    }

    fn optional_string(&mut self, object: &Map<String, Value>, key: &str, path: &str) {
        if let Some(value) = object.get(key) {
            self.string(value, &join(path, key));
        }
    }

    fn optional_string_array(&mut self, object: &Map<String, Value>, key: &str, path: &str) {
        let Some(value) = object.get(key) else {
            return;
        };
        let path = join(path, key);
        match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.string(item, &join(&path, &i.to_string()));
                }
            }
            None => self.issue(&path, "expected an array of strings"),
        }
    }

    fn string_record(&mut self, value: &Value, path: &str) {
        if let Some(record) = self.object(value, path) {
            for (key, item) in record {
                self.string(item, &join(path, key));
            }
        }
    }

    fn optional_uris(&mut self, object: &Map<String, Value>, path: &str) {
        if let Some(uris) = object.get("uris") {
            self.string_record(uris, &join(path, "uris"));
        }
    }

    fn optional_extensions(&mut self, object: &Map<String, Value>, path: &str) {
        if let Some(extensions) = object.get("extensions") {
            self.object(extensions, &join(path, "extensions"));
        }
    }

    fn non_negative_integer(&mut self, value: &Value, path: &str) -> Option<u64> {
        let n = value.as_u64();
        if n.is_none() {
            self.issue(path, "expected a non-negative integer");
        }
        n
    }

    fn optional_decimals(&mut self, object: &Map<String, Value>, path: &str) {
        let Some(value) = object.get("decimals") else {
            return;
        };
        let path = join(path, "decimals");
        if let Some(n) = self.non_negative_integer(value, &path) {
            if n > MAX_DECIMALS {
                self.issue(&path, format!("must be at most {MAX_DECIMALS}"));
            }
        }
    }

    fn optional_enum(&mut self, object: &Map<String, Value>, key: &str, allowed: &[&str], path: &str) {
        let Some(value) = object.get(key) else {
            return;
        };
        let path = join(path, key);
        match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            _ => self.issue(&path, format!("expected one of {}", allowed.join(", "))),
        }
    }

    fn registry(&mut self, value: &Value) {
        let Some(root) = self.object(value, "") else {
            return;
        };
        self.optional_string(root, "$schema", "");

        if let Some(version) = self.required(root, "version", "") {
            if let Some(version) = self.object(version, "version") {
                for part in ["major", "minor", "patch"] {
                    if let Some(n) = self.required(version, part, "version") {
                        self.non_negative_integer(n, &join("version", part));
                    }
                }
            }
        }
        self.required_string(root, "latestRevision", "");

        if let Some(identity) = self.required(root, "registryIdentity", "") {
            if !identity.is_string() {
                self.registry_identity(identity, "registryIdentity");
            }
        }

        if let Some(identities) = root.get("identities") {
            if let Some(identities) = self.object(identities, "identities") {
                for (authbase, history) in identities {
                    let path = join("identities", authbase);
                    if let Some(history) = self.object(history, &path) {
                        for (timestamp, snapshot) in history {
                            self.identity_snapshot(snapshot, &join(&path, timestamp));
                        }
                    }
                }
            }
        }

        if let Some(tags) = root.get("tags") {
            if let Some(tags) = self.object(tags, "tags") {
                for (id, tag) in tags {
                    self.tag(tag, &join("tags", id));
                }
            }
        }

        self.optional_string(root, "defaultChain", "");
        if let Some(chains) = root.get("chains") {
            if let Some(chains) = self.object(chains, "chains") {
                for (id, history) in chains {
                    let path = join("chains", id);
                    if let Some(history) = self.object(history, &path) {
                        for (timestamp, snapshot) in history {
                            self.chain_snapshot(snapshot, &join(&path, timestamp));
                        }
                    }
                }
            }
        }
        self.optional_string(root, "license", "");
        self.optional_extensions(root, "");
    }

    fn registry_identity(&mut self, value: &Value, path: &str) {
        let Some(identity) = self.object(value, path) else {
            return;
        };
        self.required_string(identity, "name", path);
        self.optional_string(identity, "description", path);
        self.optional_string_array(identity, "tags", path);
        self.optional_uris(identity, path);
        self.optional_extensions(identity, path);
    }

    fn tag(&mut self, value: &Value, path: &str) {
        let Some(tag) = self.object(value, path) else {
            return;
        };
        self.required_string(tag, "name", path);
        self.optional_string(tag, "description", path);
        self.optional_uris(tag, path);
        self.optional_extensions(tag, path);
    }

    fn chain_snapshot(&mut self, value: &Value, path: &str) {
        let Some(snapshot) = self.object(value, path) else {
            return;
        };
        self.required_string(snapshot, "name", path);
        self.optional_string(snapshot, "description", path);
        self.optional_string_array(snapshot, "tags", path);
        if let Some(token) = self.required(snapshot, "token", path) {
            let token_path = join(path, "token");
            if let Some(token) = self.object(token, &token_path) {
                self.required_string(token, "symbol", &token_path);
                self.optional_decimals(token, &token_path);
            }
        }
        self.optional_enum(snapshot, "status", &STATUSES, path);
        self.optional_string(snapshot, "splitId", path);
        self.optional_uris(snapshot, path);
        self.optional_extensions(snapshot, path);
    }

    fn identity_snapshot(&mut self, value: &Value, path: &str) {
        let Some(snapshot) = self.object(value, path) else {
            return;
        };
        self.required_string(snapshot, "name", path);
        self.optional_string(snapshot, "description", path);
        self.optional_string_array(snapshot, "tags", path);
        self.optional_string(snapshot, "migrated", path);
        if let Some(token) = snapshot.get("token") {
            self.token_category(token, &join(path, "token"));
        }
        self.optional_enum(snapshot, "status", &STATUSES, path);
        self.optional_string(snapshot, "splitId", path);
        self.optional_uris(snapshot, path);
        self.optional_extensions(snapshot, path);
    }

    fn token_category(&mut self, value: &Value, path: &str) {
        let Some(token) = self.object(value, path) else {
            return;
        };
        self.required_string(token, "category", path);
        self.required_string(token, "symbol", path);
        self.optional_decimals(token, path);
        if let Some(nfts) = token.get("nfts") {
            self.nft_category(nfts, &join(path, "nfts"));
        }
    }

    fn nft_category(&mut self, value: &Value, path: &str) {
        let Some(nfts) = self.object(value, path) else {
            return;
        };
        self.optional_string(nfts, "description", path);

        if let Some(fields) = nfts.get("fields") {
            let fields_path = join(path, "fields");
            if let Some(fields) = self.object(fields, &fields_path) {
                for (id, field) in fields {
                    self.nft_field(field, &join(&fields_path, id));
                }
            }
        }

        if let Some(parse) = self.required(nfts, "parse", path) {
            let parse_path = join(path, "parse");
            if let Some(parse) = self.object(parse, &parse_path) {
                self.optional_string(parse, "bytecode", &parse_path);
                if let Some(types) = self.required(parse, "types", &parse_path) {
                    let types_path = join(&parse_path, "types");
                    if let Some(types) = self.object(types, &types_path) {
                        for (commitment, nft_type) in types {
                            self.nft_type(nft_type, &join(&types_path, commitment));
                        }
                    }
                }
            }
        }
    }

    fn nft_field(&mut self, value: &Value, path: &str) {
        let Some(field) = self.object(value, path) else {
            return;
        };
        self.optional_string(field, "name", path);
        self.optional_string(field, "description", path);
        self.optional_uris(field, path);
        self.optional_extensions(field, path);

        let Some(encoding) = self.required(field, "encoding", path) else {
            return;
        };
        let encoding_path = join(path, "encoding");
        let Some(encoding) = self.object(encoding, &encoding_path) else {
            return;
        };
        if self.required(encoding, "type", &encoding_path).is_none() {
            return;
        }
        self.optional_enum(encoding, "type", &FIELD_ENCODINGS, &encoding_path);
        if encoding.get("type").and_then(Value::as_str) == Some("number") {
            self.optional_enum(encoding, "aggregate", &["add"], &encoding_path);
            self.optional_decimals(encoding, &encoding_path);
            self.optional_string(encoding, "unit", &encoding_path);
        }
    }

    fn nft_type(&mut self, value: &Value, path: &str) {
        let Some(nft_type) = self.object(value, path) else {
            return;
        };
        self.required_string(nft_type, "name", path);
        self.optional_string(nft_type, "description", path);
        self.optional_string_array(nft_type, "fields", path);
        self.optional_uris(nft_type, path);
        self.optional_extensions(nft_type, path);
    }

    fn token_metadata(&mut self, value: &Value) {
        let Some(metadata) = self.object(value, "") else {
            return;
        };
        self.required_string(metadata, "name", "");
        self.optional_string(metadata, "description", "");
        if let Some(token) = metadata.get("token") {
            if let Some(token) = self.object(token, "token") {
                self.required_string(token, "symbol", "token");
                self.optional_decimals(token, "token");
            }
        }
        if let Some(uris) = self.required(metadata, "uris", "") {
            self.string_record(uris, "uris");
        }
    }
}
