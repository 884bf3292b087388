//! Locking bytecode templates the explorer recognises.

/// OP_RETURN.
pub const OP_RETURN: u8 = 0x6a;
const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_HASH256: u8 = 0xaa;
const OP_EQUAL: u8 = 0x87;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;

/// ASCII `BCMR`.
pub const BCMR_MARKER: [u8; 4] = *b"BCMR";

/// `OP_RETURN OP_PUSHBYTES_4 'BCMR'`: the start of every BCMR publication output.
pub const BCMR_PUBLICATION_PREFIX: [u8; 6] = [OP_RETURN, 0x04, b'B', b'C', b'M', b'R'];

/// `OP_DUP OP_HASH160 OP_PUSHBYTES_20`.
const P2PKH_PREFIX: [u8; 3] = [OP_DUP, OP_HASH160, 0x14];
/// `OP_EQUALVERIFY OP_CHECKSIG`.
const P2PKH_SUFFIX: [u8; 2] = [OP_EQUALVERIFY, OP_CHECKSIG];
const P2PKH_LEN: usize = 25;

/// `OP_HASH256 OP_PUSHBYTES_32`: the 32-byte script-hash template AuthGuard
/// contracts are deployed under.
const AUTH_GUARD_PREFIX: [u8; 2] = [OP_HASH256, 0x20];

const P2SH20_LEN: usize = 23;
const P2SH32_LEN: usize = 35;

/// Shape of a locking bytecode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockingKind {
    /// Pay to public key hash, carrying the 20-byte key hash.
    P2pkh([u8; 20]),
    /// Legacy 20-byte pay to script hash.
    P2sh20([u8; 20]),
    /// 32-byte pay to script hash.
    P2sh32([u8; 32]),
    /// Provably unspendable data carrier.
    OpReturn,
    /// Anything else: bare multisig, custom covenants, ...
    NonStandard,
}

impl LockingKind {
    /// Whether the script is controlled by a single key or a single script hash.
    pub fn is_addressable(&self) -> bool {
        matches!(self, Self::P2pkh(_) | Self::P2sh20(_) | Self::P2sh32(_))
    }
}

/// Classify a locking bytecode.
pub fn classify(bytecode: &[u8]) -> LockingKind {
    if is_p2pkh(bytecode) {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&bytecode[3..23]);
        return LockingKind::P2pkh(hash);
    }
    if bytecode.len() == P2SH20_LEN
        && bytecode[0] == OP_HASH160
        && bytecode[1] == 0x14
        && bytecode[22] == OP_EQUAL
    {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&bytecode[2..22]);
        return LockingKind::P2sh20(hash);
    }
    if bytecode.len() == P2SH32_LEN
        && bytecode.starts_with(&AUTH_GUARD_PREFIX)
        && bytecode[34] == OP_EQUAL
    {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytecode[2..34]);
        return LockingKind::P2sh32(hash);
    }
    if bytecode.first() == Some(&OP_RETURN) {
        return LockingKind::OpReturn;
    }
    LockingKind::NonStandard
}

/// Standard pay-to-public-key-hash: 25 bytes, `76a914 <20> 88ac`.
pub fn is_p2pkh(bytecode: &[u8]) -> bool {
    bytecode.len() == P2PKH_LEN
        && bytecode.starts_with(&P2PKH_PREFIX)
        && bytecode.ends_with(&P2PKH_SUFFIX)
}

/// Whether an output publishes a BCMR registry location.
pub fn is_bcmr_publication(bytecode: &[u8]) -> bool {
    bytecode.starts_with(&BCMR_PUBLICATION_PREFIX)
}

/// Whether an identity output sits behind the AuthGuard script-hash template.
pub fn uses_auth_guard(bytecode: &[u8]) -> bool {
    bytecode.starts_with(&AUTH_GUARD_PREFIX)
}
