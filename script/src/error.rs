use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script does not start with OP_RETURN")]
    NotOpReturn,

    #[error("unsupported opcode 0x{opcode:02x} at byte {position}")]
    UnsupportedOpcode { opcode: u8, position: usize },

    #[error("push at byte {position} needs {needed} bytes, only {available} remain")]
    Truncated {
        position: usize,
        needed: usize,
        available: usize,
    },

    #[error("not a BCMR publication: {0}")]
    NotBcmr(String),
}
