//! Off-chain registry (BCMR) metadata for a token identity.
//!
//! These are the explorer's view of a BCMR identity snapshot. Every field a
//! registry author can get wrong is optional or defaulted so that documents
//! failing schema validation can still be shown.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier → URI map (`icon`, `web`, `support`, ...).
pub type Uris = BTreeMap<String, String>;

/// Metadata of one token identity as published in its registry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenCategoryInfo>,
    #[serde(default)]
    pub uris: Uris,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "splitId")]
    pub split_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl MetadataDocument {
    pub fn symbol(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.symbol.as_str())
    }

    pub fn decimals(&self) -> u8 {
        self.token.as_ref().and_then(|t| t.decimals).unwrap_or(0)
    }

    pub fn web_uri(&self) -> Option<&str> {
        self.uris.get("web").map(String::as_str)
    }

    /// The image to show for the token: `image`, falling back to `icon`.
    pub fn image_or_icon(&self) -> Option<&str> {
        self.uris
            .get("image")
            .or_else(|| self.uris.get("icon"))
            .map(String::as_str)
    }

    /// URI identifiers other than the ones rendered specially.
    pub fn other_uri_keys(&self) -> Vec<&str> {
        self.uris
            .keys()
            .map(String::as_str)
            .filter(|k| !matches!(*k, "icon" | "image" | "web"))
            .collect()
    }
}

/// The `token` section of an identity snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCategoryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfts: Option<NftCategory>,
}

/// NFT collection description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NftCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, NftField>,
    #[serde(default)]
    pub parse: NftParse,
}

impl NftCategory {
    /// Sequential collections list NFTs by commitment instead of parsing them.
    pub fn is_sequential(&self) -> bool {
        self.parse.bytecode.is_none()
    }
}

/// How NFT commitments map to types.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NftParse {
    /// Parse bytecode; absent for sequential collections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode: Option<String>,
    #[serde(default)]
    pub types: BTreeMap<String, NftType>,
}

/// One NFT field definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NftField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub encoding: NftFieldEncoding,
}

/// How an NFT field's bytes are interpreted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NftFieldEncoding {
    /// `binary`, `boolean`, `hex`, `https-url`, `ipfs-cid`, `utf8`, `locktime` or `number`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// One NFT type definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NftType {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub uris: Uris,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_falls_back_to_icon() {
        let mut doc = MetadataDocument::default();
        doc.uris.insert("icon".into(), "ipfs://icon".into());
        assert_eq!(doc.image_or_icon(), Some("ipfs://icon"));
        doc.uris.insert("image".into(), "https://img".into());
        assert_eq!(doc.image_or_icon(), Some("https://img"));
    }

    #[test]
    fn other_uri_keys_skip_rendered_ones() {
        let mut doc = MetadataDocument::default();
        for key in ["icon", "web", "support", "chat"] {
            doc.uris.insert(key.into(), format!("https://{key}"));
        }
        assert_eq!(doc.other_uri_keys(), vec!["chat", "support"]);
    }

    #[test]
    fn nft_parse_section_deserializes() {
        let doc: MetadataDocument = serde_json::from_str(
            r#"{"name":"Cats","token":{"category":"ab","symbol":"CAT",
                "nfts":{"parse":{"types":{"":{"name":"Cat"}}}}}}"#,
        )
        .unwrap();
        let nfts = doc.token.unwrap().nfts.unwrap();
        assert!(nfts.is_sequential());
        assert_eq!(nfts.parse.types[""].name, "Cat");
    }
}
