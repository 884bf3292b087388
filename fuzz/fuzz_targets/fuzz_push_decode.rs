#![no_main]

use cashscope_script::{decode_pushes, describe_segments, BcmrPayload};
use libfuzzer_sys::fuzz_target;

// Arbitrary locking bytecode must never panic the OP_RETURN decoder.
fuzz_target!(|data: &[u8]| {
    let Ok(segments) = decode_pushes(data) else {
        return;
    };

    // Pushed bytes can never exceed the script they came from.
    let pushed: usize = segments.iter().map(Vec::len).sum();
    assert!(pushed < data.len());

    let rendered = describe_segments(&segments);
    assert_eq!(rendered.len(), segments.len());

    if let Ok(payload) = BcmrPayload::parse(data) {
        if let Some(hex) = payload.content_hash_hex() {
            assert_eq!(hex.len(), payload.content_hash.as_ref().map_or(0, Vec::len) * 2);
        }
        assert_eq!(payload.uris.len() + 2, segments.len().max(2));
    }
});
