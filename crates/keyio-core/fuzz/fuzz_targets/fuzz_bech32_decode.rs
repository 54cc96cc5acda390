//! Fuzz test for bech32/bech32m and segwit decoding
//!
//! Ensures the decoders handle malformed input gracefully and that accepted
//! strings re-encode to their lowercase form

#![no_main]

use keyio_core::segwit;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok((hrp, groups, variant)) = segwit::decode(s) {
            let encoded = segwit::encode(&hrp, &groups, variant).expect("decoded hrp re-encodes");
            assert_eq!(encoded, s.to_ascii_lowercase());
        }
        if let Some(program) = keyio_core::validate::decode_any_bech32(s) {
            let encoded =
                segwit::encode_segwit(&program.hrp, program.version, &program.program, program.variant)
                    .expect("decoded program re-encodes");
            assert_eq!(encoded, s.to_ascii_lowercase());
        }
    }
});
