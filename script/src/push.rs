//! OP_RETURN push decoding.
//!
//! A data-carrier output is `OP_RETURN` followed by a sequence of pushes.
//! Three push encodings are understood:
//!
//! | opcode        | length field              |
//! |---------------|---------------------------|
//! | `0x01..=0x4b` | the opcode itself         |
//! | `0x4c`        | next byte                 |
//! | `0x4d`        | next two bytes, little endian |
//!
//! `OP_0` pushes an empty segment. Any other opcode ends decoding with an error.

use crate::error::ScriptError;
use crate::patterns::OP_RETURN;

const OP_0: u8 = 0x00;
const MAX_DIRECT_PUSH: u8 = 0x4b;
const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;

/// Split an OP_RETURN script into the byte segments it pushes, in order.
pub fn decode_pushes(script: &[u8]) -> Result<Vec<Vec<u8>>, ScriptError> {
    if script.first() != Some(&OP_RETURN) {
        return Err(ScriptError::NotOpReturn);
    }

    let mut segments = Vec::new();
    let mut pos = 1;
    while pos < script.len() {
        let opcode = script[pos];
        let opcode_pos = pos;
        pos += 1;

        let len = match opcode {
            OP_0 => 0,
            0x01..=MAX_DIRECT_PUSH => usize::from(opcode),
            OP_PUSHDATA1 => {
                let field = take(script, pos, 1)?;
                pos += 1;
                usize::from(field[0])
            }
            OP_PUSHDATA2 => {
                let field = take(script, pos, 2)?;
                pos += 2;
                usize::from(u16::from_le_bytes([field[0], field[1]]))
            }
            other => {
                return Err(ScriptError::UnsupportedOpcode {
                    opcode: other,
                    position: opcode_pos,
                })
            }
        };

        segments.push(take(script, pos, len)?.to_vec());
        pos += len;
    }

    Ok(segments)
}

fn take(script: &[u8], pos: usize, len: usize) -> Result<&[u8], ScriptError> {
    let available = script.len().saturating_sub(pos);
    if available < len {
        return Err(ScriptError::Truncated {
            position: pos,
            needed: len,
            available,
        });
    }
    Ok(&script[pos..pos + len])
}
