//! Script-level helpers for the explorer.
//!
//! - Recognising standard locking bytecode shapes (P2PKH, P2SH, AuthGuard)
//! - Detecting BCMR publication outputs (`OP_RETURN <'BCMR'> ...`)
//! - Splitting an OP_RETURN script into its pushed segments

pub mod error;
pub mod patterns;
pub mod publication;
pub mod push;

pub use error::ScriptError;
pub use patterns::{
    classify, is_bcmr_publication, is_p2pkh, uses_auth_guard, LockingKind, BCMR_MARKER,
    BCMR_PUBLICATION_PREFIX,
};
pub use publication::{describe_segments, BcmrPayload};
pub use push::decode_pushes;
