#![no_main]

use libfuzzer_sys::fuzz_target;
use typesig::types::signature::{Resolution, compose::type_signature, parse};

fuzz_target!(|data: &str| {
    if let Ok(sig) = type_signature(data, Resolution::Unresolved) {
        assert!(parse(&sig).is_ok(), "Encoded type names must be valid signatures");
    }
});
