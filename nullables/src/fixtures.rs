//! Builders for realistic on-chain test data.

use cashscope_sources::{AuthHeadRecord, AuthchainRecord, GenesisRecord, MigrationRecord};
use cashscope_types::{
    LockingBytecode, NftCapability, Timestamp, TokenId, TxHash, UnspentOutput,
};

/// A transaction hash filled with one byte.
pub fn tx(byte: u8) -> TxHash {
    TxHash::new([byte; 32])
}

pub fn token_id(byte: u8) -> TokenId {
    TokenId::new(tx(byte))
}

/// `76a914 <20 × fill> 88ac`.
pub fn p2pkh(fill: u8) -> LockingBytecode {
    let mut script = vec![0x76, 0xa9, 0x14];
    script.extend([fill; 20]);
    script.extend([0x88, 0xac]);
    LockingBytecode::new(script)
}

/// `aa20 <32 × fill> 87`, the AuthGuard template.
pub fn p2sh32(fill: u8) -> LockingBytecode {
    let mut script = vec![0xaa, 0x20];
    script.extend([fill; 32]);
    script.push(0x87);
    LockingBytecode::new(script)
}

/// `OP_RETURN <'BCMR'> <hash> <uri>...` using the smallest push for each segment.
pub fn publication(content_hash: &[u8], uris: &[&str]) -> LockingBytecode {
    let mut script = vec![0x6a];
    push(&mut script, b"BCMR");
    push(&mut script, content_hash);
    for uri in uris {
        push(&mut script, uri.as_bytes());
    }
    LockingBytecode::new(script)
}

fn push(script: &mut Vec<u8>, data: &[u8]) {
    match data.len() {
        0 => script.push(0x00),
        n @ 1..=0x4b => script.push(n as u8),
        n @ 0x4c..=0xff => script.extend([0x4c, n as u8]),
        n => {
            script.push(0x4d);
            script.extend((n as u16).to_le_bytes());
        }
    }
    script.extend_from_slice(data);
}

/// `count` distinct immutable NFT outputs held by P2PKH addresses.
pub fn nft_outputs(count: usize) -> Vec<UnspentOutput> {
    (0..count)
        .map(|i| {
            let mut hash = [0u8; 32];
            hash[..8].copy_from_slice(&(i as u64).to_le_bytes());
            UnspentOutput::nft(p2pkh((i % 251) as u8), NftCapability::None)
                .with_outpoint(TxHash::new(hash), 0)
        })
        .collect()
}

/// Genesis transaction creating `amounts` in separate outputs.
pub fn genesis(token: TokenId, timestamp: u64, amounts: &[u64]) -> GenesisRecord {
    let mut hash = *token.genesis_tx().as_bytes();
    hash[31] ^= 0xff;
    GenesisRecord {
        tx_hash: TxHash::new(hash),
        timestamp: Some(Timestamp::new(timestamp)),
        outputs: amounts
            .iter()
            .map(|a| UnspentOutput::fungible(p2pkh(1), *a))
            .collect(),
    }
}

/// A migration moving the identity output to `identity`, optionally publishing.
pub fn migration(
    hash: TxHash,
    timestamp: Option<u64>,
    identity: LockingBytecode,
    publication: Option<LockingBytecode>,
) -> MigrationRecord {
    let mut outputs = vec![identity];
    outputs.extend(publication);
    MigrationRecord {
        tx_hash: hash,
        timestamp: timestamp.map(Timestamp::new),
        outputs,
    }
}

/// Authchain whose head is the last migration, holding `reserved` units.
pub fn authchain(migrations: Vec<MigrationRecord>, reserved: u64) -> AuthchainRecord {
    let head = migrations
        .last()
        .map(|m| m.tx_hash)
        .unwrap_or(TxHash::new([0; 32]));
    let identity = migrations
        .last()
        .and_then(|m| m.outputs.first().cloned())
        .map(|lb| UnspentOutput::fungible(lb, reserved).with_outpoint(head, 0));
    AuthchainRecord {
        length: migrations.len() as u64,
        head: AuthHeadRecord {
            tx_hash: head,
            identity_output: identity,
        },
        migrations,
    }
}
