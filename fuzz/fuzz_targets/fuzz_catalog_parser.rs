#![no_main]

use libfuzzer_sys::fuzz_target;
use waymark::catalog::{BuiltinPatternRegistry, LegacyPatternTable, parse_document};

fuzz_target!(|data: &str| {
    // Fuzz the document parser with arbitrary YAML
    // Malformed documents must be absorbed, never panic
    if let Ok(doc) = serde_yaml::from_str::<serde_yaml::Value>(data) {
        let _ = parse_document(&doc, &LegacyPatternTable::new(), &BuiltinPatternRegistry);
    }
});
