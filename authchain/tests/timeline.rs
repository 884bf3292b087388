//! Walking then reconciling, the way a lookup uses this crate.

use cashscope_authchain::{
    build_authchain, latest_publication, merge_timeline, RegistryRevision,
};
use cashscope_nullables::fixtures::{self, migration, p2pkh, publication, tx};
use cashscope_types::{Network, TxHash};

#[test]
fn funding_genesis_and_two_migrations() {
    let token = fixtures::token_id(0x10);
    let record = fixtures::authchain(
        vec![
            migration(tx(0x0f), Some(100), p2pkh(1), None),
            migration(tx(0x10), Some(200), p2pkh(1), None),
            migration(tx(0x11), Some(300), p2pkh(2), Some(publication(&[0xaa; 32], &["ipfs://bafy1"]))),
            migration(tx(0x12), Some(400), p2pkh(3), Some(publication(&[0xbb; 32], &["example.com/r.json"]))),
        ],
        25,
    );

    let chain = build_authchain(&token, record, Network::Mainnet).unwrap();
    let hashes: Vec<TxHash> = chain.entries.iter().map(|e| e.tx_hash).collect();
    assert_eq!(hashes, vec![tx(0x10), tx(0x11), tx(0x12)]);

    let revisions = vec![RegistryRevision {
        tx_hash: tx(0x12),
        content_hash: Some("bb".repeat(32)),
        uris: vec!["example.com/r.json".into()],
        https_url: Some("https://example.com/r.json".into()),
    }];
    let merged = merge_timeline(&token, &chain.entries, &revisions);
    assert_eq!(merged.len(), 3);
    assert!(merged[0].is_genesis);
    assert!(merged[2].is_auth_head);
    assert_eq!(merged[2].https_url.as_deref(), Some("https://example.com/r.json"));
    assert_eq!(merged[2].timestamp, chain.entries[2].timestamp);

    let latest = latest_publication(&merged).unwrap().unwrap();
    assert_eq!(latest.tx_hash, tx(0x12));
    assert_eq!(latest.uris(), ["example.com/r.json"]);
    assert_eq!(
        chain.identity_output.unwrap().fungible_amount,
        Some(25)
    );
}

mod properties {
    use super::*;
    use cashscope_types::{AuthchainEntry, TokenId};
    use proptest::prelude::*;

    proptest! {
        /// Registry data never adds, drops or reorders on-chain entries.
        #[test]
        fn merge_preserves_chain_order(
            chain_len in 1usize..20,
            revision_picks in prop::collection::vec(0u8..40, 0..10),
        ) {
            let token = TokenId::new(tx(0));
            let entries: Vec<AuthchainEntry> = (0..chain_len)
                .map(|i| AuthchainEntry::on_chain(tx(i as u8), None, None))
                .collect();
            let revisions: Vec<RegistryRevision> = revision_picks
                .iter()
                .map(|b| RegistryRevision {
                    tx_hash: tx(*b),
                    content_hash: None,
                    uris: vec![format!("https://r{b}.example/bcmr.json")],
                    https_url: None,
                })
                .collect();

            let merged = merge_timeline(&token, &entries, &revisions);
            let before: Vec<TxHash> = entries.iter().map(|e| e.tx_hash).collect();
            let after: Vec<TxHash> = merged.iter().map(|e| e.tx_hash).collect();
            prop_assert_eq!(before, after);
            prop_assert!(merged[0].is_genesis);
            prop_assert!(merged[chain_len - 1].is_auth_head);
            for entry in &merged {
                let matched = revision_picks.iter().any(|b| tx(*b) == entry.tx_hash);
                prop_assert_eq!(entry.is_metadata_update, matched);
            }
        }
    }
}
