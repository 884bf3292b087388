//! CashAddress encoding of locking bytecode.
//!
//! Address format: `<prefix>:` + base32(version byte ‖ hash ‖ 40-bit checksum)
//!
//! The version byte packs the address type in bits 3..7 (0 = P2PKH, 1 = P2SH,
//! +2 for token-aware variants) and the hash size in bits 0..3 (0 = 160 bits,
//! 3 = 256 bits). The checksum is a BCH code over the lower five bits of each
//! prefix character, a zero separator and the payload.
//! Base32 alphabet: `qpzry9x8gf2tvdw0s3jn54khce6mua7l`.

use cashscope_script::{classify, LockingKind};
use cashscope_types::Network;
use std::fmt;
use thiserror::Error;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const CHARSET_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[CHARSET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const GENERATORS: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470,
];

/// Checksum length in base32 characters (40 bits).
const CHECKSUM_CHARS: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address mixes upper and lower case")]
    MixedCase,

    #[error("invalid character {0:?} in address")]
    InvalidCharacter(char),

    #[error("address checksum does not verify")]
    BadChecksum,

    #[error("address payload is malformed")]
    BadPayload,

    #[error("unsupported address version byte 0x{0:02x}")]
    UnsupportedVersion(u8),

    #[error("unsupported hash length {0}")]
    UnsupportedHashLength(usize),
}

/// What a CashAddress pays to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressKind {
    P2pkh,
    P2sh,
}

/// A decoded CashAddress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CashAddress {
    pub prefix: String,
    pub kind: AddressKind,
    /// Token-aware addresses signal a wallet that can receive CashTokens.
    pub token_aware: bool,
    pub hash: Vec<u8>,
}

impl CashAddress {
    /// Build the address for a standard locking bytecode, if it has one.
    pub fn from_locking_bytecode(prefix: &str, bytecode: &[u8]) -> Option<Self> {
        let (kind, hash) = match classify(bytecode) {
            LockingKind::P2pkh(hash) => (AddressKind::P2pkh, hash.to_vec()),
            LockingKind::P2sh20(hash) => (AddressKind::P2sh, hash.to_vec()),
            LockingKind::P2sh32(hash) => (AddressKind::P2sh, hash.to_vec()),
            LockingKind::OpReturn | LockingKind::NonStandard => return None,
        };
        Some(Self {
            prefix: prefix.to_string(),
            kind,
            token_aware: false,
            hash,
        })
    }

    fn version_byte(&self) -> Result<u8, AddressError> {
        let mut type_bits = match self.kind {
            AddressKind::P2pkh => 0,
            AddressKind::P2sh => 1,
        };
        if self.token_aware {
            type_bits += 2;
        }
        Ok(type_bits << 3 | size_bits(self.hash.len())?)
    }

    /// Render as `prefix:payload`.
    pub fn encode(&self) -> Result<String, AddressError> {
        let mut payload = Vec::with_capacity(self.hash.len() + 1);
        payload.push(self.version_byte()?);
        payload.extend_from_slice(&self.hash);
        let mut data = convert_bits(&payload, 8, 5, true).ok_or(AddressError::BadPayload)?;

        let mut checked = prefix_expand(&self.prefix);
        checked.extend_from_slice(&data);
        checked.extend([0u8; CHECKSUM_CHARS]);
        let checksum = polymod(&checked);
        for i in 0..CHECKSUM_CHARS {
            data.push(((checksum >> (5 * (CHECKSUM_CHARS - 1 - i))) & 0x1f) as u8);
        }

        let mut out = String::with_capacity(self.prefix.len() + 1 + data.len());
        out.push_str(&self.prefix);
        out.push(':');
        out.extend(data.iter().map(|&v| CHARSET[v as usize] as char));
        Ok(out)
    }
}

impl fmt::Display for CashAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}:<invalid>", self.prefix),
        }
    }
}

fn size_bits(hash_len: usize) -> Result<u8, AddressError> {
    Ok(match hash_len {
        20 => 0,
        24 => 1,
        28 => 2,
        32 => 3,
        40 => 4,
        48 => 5,
        56 => 6,
        64 => 7,
        other => return Err(AddressError::UnsupportedHashLength(other)),
    })
}

fn hash_len(size_bits: u8) -> usize {
    [20, 24, 28, 32, 40, 48, 56, 64][usize::from(size_bits & 0x07)]
}

fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if c0 & (1 << i) != 0 {
                c ^= generator;
            }
        }
    }
    c ^ 1
}

fn prefix_expand(prefix: &str) -> Vec<u8> {
    let mut out: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    out.push(0);
    out
}

/// Regroup bits between word sizes. Without padding, leftover bits must be
/// fewer than `from` and all zero.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_value: u32 = (1 << to) - 1;
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let value = u32::from(value);
        if value >> from != 0 {
            return None;
        }
        acc = ((acc << from) | value) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return None;
    }
    Some(out)
}

/// Encode a P2PKH / P2SH20 / P2SH32 locking bytecode as a CashAddress.
///
/// Returns `None` for any other script shape.
pub fn encode_cash_address(prefix: &str, locking_bytecode: &[u8]) -> Option<String> {
    CashAddress::from_locking_bytecode(prefix, locking_bytecode)?
        .encode()
        .ok()
}

/// [`encode_cash_address`] with the network's prefix.
pub fn locking_bytecode_address(network: Network, locking_bytecode: &[u8]) -> Option<String> {
    encode_cash_address(network.cashaddr_prefix(), locking_bytecode)
}

/// Decode a CashAddress. `default_prefix` applies when the address omits one.
pub fn decode_cash_address(address: &str, default_prefix: &str) -> Result<CashAddress, AddressError> {
    let has_lower = address.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = address.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(AddressError::MixedCase);
    }
    let address = address.to_ascii_lowercase();

    let (prefix, payload) = match address.rsplit_once(':') {
        Some((prefix, payload)) => (prefix.to_string(), payload),
        None => (default_prefix.to_ascii_lowercase(), address.as_str()),
    };

    let mut values = Vec::with_capacity(payload.len());
    for c in payload.chars() {
        let value = if c.is_ascii() {
            CHARSET_DECODE[c as usize]
        } else {
            0xFF
        };
        if value == 0xFF {
            return Err(AddressError::InvalidCharacter(c));
        }
        values.push(value);
    }
    if values.len() <= CHECKSUM_CHARS {
        return Err(AddressError::BadPayload);
    }

    let mut checked = prefix_expand(&prefix);
    checked.extend_from_slice(&values);
    if polymod(&checked) != 0 {
        return Err(AddressError::BadChecksum);
    }

    let data = &values[..values.len() - CHECKSUM_CHARS];
    let bytes = convert_bits(data, 5, 8, false).ok_or(AddressError::BadPayload)?;
    let (&version, hash) = bytes.split_first().ok_or(AddressError::BadPayload)?;

    if version & 0x80 != 0 {
        return Err(AddressError::UnsupportedVersion(version));
    }
    let (kind, token_aware) = match version >> 3 {
        0 => (AddressKind::P2pkh, false),
        1 => (AddressKind::P2sh, false),
        2 => (AddressKind::P2pkh, true),
        3 => (AddressKind::P2sh, true),
        _ => return Err(AddressError::UnsupportedVersion(version)),
    };
    if hash.len() != hash_len(version) {
        return Err(AddressError::UnsupportedHashLength(hash.len()));
    }

    Ok(CashAddress {
        prefix,
        kind,
        token_aware,
        hash: hash.to_vec(),
    })
}
