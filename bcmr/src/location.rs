//! From declared URIs to fetchable locations.

use cashscope_types::MetadataDocument;

const IPFS_SCHEME: &str = "ipfs://";
const HTTPS_SCHEME: &str = "https://";

/// Rewrite an `ipfs://<cid>/<path>` URI onto an HTTP gateway.
pub fn gateway_url(uri: &str, gateway: &str) -> Option<String> {
    let path = uri.strip_prefix(IPFS_SCHEME)?;
    Some(format!(
        "{}/{}",
        gateway.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

/// The HTTPS location a declared registry URI is fetched from.
///
/// `ipfs://` goes through the gateway, `https://` is kept and a URI without
/// a scheme is read as HTTPS. Other schemes cannot be fetched.
pub fn resolve_https_url(uri: &str, gateway: &str) -> Option<String> {
    let uri = uri.trim();
    if uri.is_empty() {
        return None;
    }
    if uri.starts_with(IPFS_SCHEME) {
        return gateway_url(uri, gateway);
    }
    if uri.starts_with(HTTPS_SCHEME) {
        return Some(uri.to_string());
    }
    if uri.contains("://") {
        return None;
    }
    Some(format!("{HTTPS_SCHEME}{uri}"))
}

/// Displayable icon for a token: `image`, else `icon`, with IPFS rewritten.
pub fn icon_url(document: &MetadataDocument, gateway: &str) -> Option<String> {
    let uri = document.image_or_icon()?;
    Some(gateway_url(uri, gateway).unwrap_or_else(|| uri.to_string()))
}
