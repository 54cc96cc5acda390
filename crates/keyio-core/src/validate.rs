//! Validity oracle
//!
//! Decides whether a string would be accepted by a conformant decoder for
//! any of the known chains. The invalid-vector generator uses it to drop
//! candidates that came out valid by chance.

use crate::base58;
use crate::segwit::{self, WitnessProgram};
use crate::template::{base58_templates, Base58Template};
use keyio_params::known_hrps;

/// Whether a decoded base58-check payload conforms to a template
///
/// A payload conforms when it starts with the template prefix, ends with
/// its suffix, and the bytes in between have the template payload length.
pub fn conforms_to(payload: &[u8], template: &Base58Template) -> bool {
    payload.len() == template.prefix.len() + template.payload_len + template.suffix.len()
        && payload.starts_with(&template.prefix)
        && payload.ends_with(&template.suffix)
}

/// First template a decoded base58-check payload conforms to
///
/// Chains that share version bytes all match the same payload, so this
/// is the first of possibly several.
pub fn matching_base58_template<'a>(
    payload: &[u8],
    templates: &'a [Base58Template],
) -> Option<&'a Base58Template> {
    templates.iter().find(|t| conforms_to(payload, t))
}

/// Check a string against the given base58 templates
pub fn is_valid_base58_with(encoded: &str, templates: &[Base58Template]) -> bool {
    match base58::decode_check(encoded) {
        Ok(payload) => matching_base58_template(&payload, templates).is_some(),
        Err(_) => false,
    }
}

/// Check a string against every base58 template
pub fn is_valid_base58(encoded: &str) -> bool {
    is_valid_base58_with(encoded, &base58_templates())
}

/// Decode a witness address under whichever known prefix accepts it
pub fn decode_any_bech32(encoded: &str) -> Option<WitnessProgram> {
    known_hrps()
        .into_iter()
        .find_map(|hrp| segwit::decode_segwit(hrp, encoded).ok())
}

/// Check a string decodes as a witness address for any known chain
pub fn is_valid_bech32(encoded: &str) -> bool {
    decode_any_bech32(encoded).is_some()
}
