//! Fuzz target for roc.toml parsing.
//!
//! Tests that configuration parsing handles arbitrary input without
//! panicking, and that accepted configs survive a write/read cycle.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roc_common::RocConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = RocConfig::from_toml_str(text) {
        if let Ok(written) = config.to_toml_string() {
            let reread = RocConfig::from_toml_str(&written);
            assert!(reread.is_ok(), "rewritten config rejected: {}", written);
        }
    }
});
