#![no_main]

use libfuzzer_sys::fuzz_target;
use typesig::types::signature::{erasure::type_erasure, parse, render::display_string};

fuzz_target!(|data: &str| {
    if parse(data).is_ok() {
        let erased = type_erasure(data).expect("Erasure of a valid signature must succeed");
        assert_eq!(
            type_erasure(&erased).as_ref(),
            Ok(&erased),
            "Erasure must be idempotent"
        );
        display_string(data).expect("Rendering of a valid signature must succeed");
    }
});
