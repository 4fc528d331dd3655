//! Fuzz target for request decoding.
//!
//! Tests that JSON request parsing and matrix assembly handle arbitrary
//! input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roc_common::request::parse_reader;
use roc_common::{BatchRequest, RocRequest};

fuzz_target!(|data: &[u8]| {
    let _ = parse_reader::<RocRequest, _>(data);

    if let Ok(req) = parse_reader::<BatchRequest, _>(data) {
        if let Ok(m) = req.to_matrix() {
            assert_eq!(m.nrows(), req.scores.len());
            assert_eq!(req.column_names().len(), m.ncols());
        }
    }
});
