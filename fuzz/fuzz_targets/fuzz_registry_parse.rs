#![no_main]

use cashscope_bcmr::{extract_document, validate, Registry, SchemaKind};
use libfuzzer_sys::fuzz_target;

// Registry documents come from arbitrary hosts; parsing and schema checks
// must hold up against any bytes.
fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let validation = validate(&value, SchemaKind::Registry);
    assert_eq!(validation.valid, validation.issues.is_empty());

    for kind in [SchemaKind::IdentitySnapshot, SchemaKind::TokenMetadata] {
        let _ = validate(&value, kind);
    }
    let _ = extract_document(&value);

    if let Ok(registry) = Registry::from_value(value) {
        let _ = registry.as_value();
    }
});
