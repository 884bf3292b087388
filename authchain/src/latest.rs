//! Decoding the newest metadata publication of a timeline.

use crate::AuthchainError;
use cashscope_script::{decode_pushes, describe_segments};
use cashscope_types::{AuthchainEntry, TxHash};
use serde::{Deserialize, Serialize};

/// The most recent publication payload, split into its pushes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestPublication {
    pub tx_hash: TxHash,
    /// Raw pushed segments after OP_RETURN.
    #[serde(skip)]
    pub segments: Vec<Vec<u8>>,
    /// Marker, `<N bytes>` for the hash, then the URIs.
    pub display: Vec<String>,
}

impl LatestPublication {
    /// Segments after the marker and hash, as text.
    pub fn uris(&self) -> &[String] {
        self.display.get(2..).unwrap_or(&[])
    }
}

/// Scan newest-first for a metadata update that carries a payload and decode it.
pub fn latest_publication(
    entries: &[AuthchainEntry],
) -> Result<Option<LatestPublication>, AuthchainError> {
    let Some((entry, payload)) = entries.iter().rev().find_map(|e| {
        e.op_return
            .as_ref()
            .filter(|_| e.is_metadata_update)
            .map(|payload| (e, payload))
    }) else {
        return Ok(None);
    };

    let segments = decode_pushes(payload.as_bytes())?;
    let display = describe_segments(&segments);
    Ok(Some(LatestPublication {
        tx_hash: entry.tx_hash,
        segments,
        display,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashscope_nullables::fixtures::{publication, tx};
    use cashscope_types::LockingBytecode;

    #[test]
    fn picks_newest_publication() {
        let entries = vec![
            AuthchainEntry::on_chain(tx(1), None, Some(publication(&[1; 32], &["old.example/b.json"]))),
            AuthchainEntry::on_chain(tx(2), None, Some(publication(&[2; 32], &["new.example/b.json"]))),
            AuthchainEntry::on_chain(tx(3), None, None),
        ];
        let latest = latest_publication(&entries).unwrap().unwrap();
        assert_eq!(latest.tx_hash, tx(2));
        assert_eq!(latest.display, vec!["BCMR", "<32 bytes>", "new.example/b.json"]);
        assert_eq!(latest.uris(), ["new.example/b.json"]);
    }

    #[test]
    fn no_publication() {
        let entries = vec![AuthchainEntry::on_chain(tx(1), None, None)];
        assert_eq!(latest_publication(&entries).unwrap(), None);
    }

    #[test]
    fn corrupt_payload_is_an_error() {
        let entries = vec![AuthchainEntry::on_chain(
            tx(1),
            None,
            Some(LockingBytecode::new(vec![0x6a, 0x04, b'B', b'C', b'M', b'R', 0x20, 0x01])),
        )];
        assert!(matches!(
            latest_publication(&entries),
            Err(AuthchainError::Payload(_))
        ));
    }
}
