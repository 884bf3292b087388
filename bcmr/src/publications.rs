//! Registry revisions recovered from on-chain publications.

use crate::location::resolve_https_url;
use cashscope_authchain::RegistryRevision;
use cashscope_script::BcmrPayload;
use cashscope_types::AuthchainEntry;

/// Decode every publication in `entries` into a registry revision.
///
/// Every metadata update yields a revision, in chain order. One whose
/// OP_RETURN is missing or does not decode has no hash and no URIs, so it
/// still supersedes the revisions before it.
pub fn publication_revisions(entries: &[AuthchainEntry], gateway: &str) -> Vec<RegistryRevision> {
    entries
        .iter()
        .filter(|entry| entry.is_metadata_update)
        .map(|entry| {
            let payload = entry
                .op_return
                .as_ref()
                .map(|script| BcmrPayload::parse(script.as_bytes()));
            match payload {
                Some(Ok(payload)) => RegistryRevision {
                    tx_hash: entry.tx_hash,
                    content_hash: payload.content_hash_hex(),
                    https_url: payload
                        .first_uri()
                        .and_then(|uri| resolve_https_url(uri, gateway)),
                    uris: payload.uris,
                },
                other => {
                    if let Some(Err(e)) = other {
                        tracing::debug!(tx = %entry.tx_hash, error = %e, "undecodable publication");
                    }
                    RegistryRevision {
                        tx_hash: entry.tx_hash,
                        content_hash: None,
                        uris: Vec::new(),
                        https_url: None,
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashscope_nullables::fixtures::{publication, tx};
    use cashscope_types::LockingBytecode;

    #[test]
    fn decodes_publications_in_chain_order() {
        let entries = vec![
            AuthchainEntry::on_chain(tx(1), None, None),
            AuthchainEntry::on_chain(
                tx(2),
                None,
                Some(publication(&[0x11; 32], &["ipfs://bafyfirst"])),
            ),
            AuthchainEntry::on_chain(
                tx(3),
                None,
                Some(publication(&[0x22; 32], &["example.com/bcmr.json", "ipfs://bafymirror"])),
            ),
        ];
        let revisions = publication_revisions(&entries, "https://gw.example/ipfs/");
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].tx_hash, tx(2));
        assert_eq!(
            revisions[0].https_url.as_deref(),
            Some("https://gw.example/ipfs/bafyfirst")
        );
        assert_eq!(revisions[1].content_hash, Some("22".repeat(32)));
        assert_eq!(revisions[1].uris.len(), 2);
        assert_eq!(
            revisions[1].https_url.as_deref(),
            Some("https://example.com/bcmr.json")
        );
    }

    #[test]
    fn undecodable_script_still_counts_as_a_revision() {
        // OP_RETURN 'BCMR' followed by a truncated push.
        let broken = LockingBytecode::new(vec![0x6a, 0x04, b'B', b'C', b'M', b'R', 0x20, 0x01]);
        let entries = vec![
            AuthchainEntry::on_chain(
                tx(4),
                None,
                Some(publication(&[0x11; 32], &["https://old.example/b.json"])),
            ),
            AuthchainEntry::on_chain(tx(5), None, Some(broken)),
        ];
        let revisions = publication_revisions(&entries, "https://gw");
        assert_eq!(revisions.len(), 2);
        let newest = &revisions[1];
        assert_eq!(newest.tx_hash, tx(5));
        assert!(newest.uris.is_empty());
        assert_eq!(newest.content_hash, None);
        assert_eq!(newest.https_url, None);
    }
}
