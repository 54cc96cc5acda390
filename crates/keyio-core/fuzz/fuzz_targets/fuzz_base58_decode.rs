//! Fuzz test for base58-check decoding
//!
//! Ensures the decoder handles malformed input gracefully and that anything
//! it accepts re-encodes to the same string

#![no_main]

use keyio_core::base58;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Should never panic, only return Err for invalid input
        if let Ok(payload) = base58::decode_check(s) {
            assert_eq!(base58::encode_check(&payload), s);
        }
        let _ = keyio_core::is_valid_base58(s);
    }
});
