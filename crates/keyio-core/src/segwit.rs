//! Bech32 and Bech32m encoding for witness programs
//!
//! Wraps the `bech32` crate's checksum primitives (BIP 173 and its BIP 350
//! variant) and adds the segwit address layer on top:
//! - witness version 0 must use Bech32
//! - witness versions 1 through 16 must use Bech32m
//!
//! The encoder takes raw 5-bit groups so the generator can build strings a
//! conformant decoder must reject (bad padding, version 17, empty data).

use crate::script::witness_opcode;
use crate::{DecodeError, Error, Result};
use bech32::primitives::decode::{CharError, UncheckedHrpstring, UncheckedHrpstringError};
use bech32::primitives::hrp::Error as HrpError;
use bech32::{ByteIterExt, Fe32, Fe32IterExt, Hrp};

/// Bech32 data character set
pub const CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Separator between the human-readable prefix and the data part
pub const SEPARATOR: char = '1';

/// Number of checksum characters
pub const CHECKSUM_LEN: usize = 6;

/// Longest string a decoder accepts
pub const MAX_LENGTH: usize = 90;

/// Highest valid witness version
pub const MAX_WITNESS_VERSION: u8 = 16;

/// Checksum variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// BIP 173 checksum, witness version 0
    Bech32,
    /// BIP 350 checksum, witness versions 1+
    Bech32m,
}

impl Variant {
    /// Variant a strict decoder requires for the witness version
    pub const fn for_witness_version(version: u8) -> Self {
        if version == 0 {
            Variant::Bech32
        } else {
            Variant::Bech32m
        }
    }
}

/// Decoded segwit address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessProgram {
    /// Lowercase human-readable prefix
    pub hrp: String,
    /// Witness version (0..=16)
    pub version: u8,
    /// Witness program bytes
    pub program: Vec<u8>,
    /// Checksum variant the string was encoded with
    pub variant: Variant,
}

impl WitnessProgram {
    /// Output script: `<version opcode> <push len> <program>`
    pub fn script_pubkey(&self) -> Result<Vec<u8>> {
        let mut script = Vec::with_capacity(self.program.len() + 2);
        script.push(witness_opcode(self.version)?);
        script.push(self.program.len() as u8);
        script.extend_from_slice(&self.program);
        Ok(script)
    }
}

/// Regroup bytes into 5-bit groups, zero-padding the last group
pub fn to_groups(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().copied().bytes_to_fes().map(Fe32::to_u8).collect()
}

/// Regroup 5-bit groups into bytes
///
/// Leftover bits must be fewer than five and all zero.
pub fn from_groups(groups: &[u8]) -> std::result::Result<Vec<u8>, DecodeError> {
    let fes = groups
        .iter()
        .map(|&g| {
            Fe32::try_from(g).map_err(|_| {
                DecodeError::InvalidCharacter(format!("value {} does not fit in 5 bits", g))
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let leftover = groups.len() * 5 % 8;
    if leftover >= 5 {
        return Err(DecodeError::InvalidPadding(format!(
            "{} leftover bits cannot be dropped",
            leftover
        )));
    }
    if let Some(&last) = groups.last() {
        if last & ((1u8 << leftover) - 1) != 0 {
            return Err(DecodeError::InvalidPadding(format!(
                "non-zero padding in final group {}",
                last
            )));
        }
    }

    Ok(fes.into_iter().fes_to_bytes().collect())
}

/// Encode a prefix and 5-bit groups into a checksummed string
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String> {
    if hrp.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(Error::Encoding(format!(
            "human-readable prefix '{}' must be lowercase",
            hrp
        )));
    }
    let parsed = Hrp::parse(hrp)
        .map_err(|e| Error::Encoding(format!("human-readable prefix '{}': {}", hrp, e)))?;

    let fes = data
        .iter()
        .map(|&d| {
            Fe32::try_from(d).map_err(|_| Error::Encoding(format!("data value {} exceeds 5 bits", d)))
        })
        .collect::<Result<Vec<_>>>()?;

    let encoded: String = match variant {
        Variant::Bech32 => fes
            .into_iter()
            .with_checksum::<bech32::Bech32>(&parsed)
            .chars()
            .collect(),
        Variant::Bech32m => fes
            .into_iter()
            .with_checksum::<bech32::Bech32m>(&parsed)
            .chars()
            .collect(),
    };
    Ok(encoded)
}

fn parse_error(encoded: &str, err: &UncheckedHrpstringError) -> DecodeError {
    match err {
        UncheckedHrpstringError::Char(CharError::MixedCase) => {
            DecodeError::MixedCase(encoded.to_string())
        }
        UncheckedHrpstringError::Char(CharError::InvalidChar(ch)) => {
            DecodeError::InvalidCharacter(format!("{:?} is not a bech32 character", ch))
        }
        UncheckedHrpstringError::Hrp(HrpError::Empty | HrpError::TooLong(_)) => {
            DecodeError::InvalidLength(err.to_string())
        }
        UncheckedHrpstringError::Hrp(_) => DecodeError::InvalidCharacter(err.to_string()),
        _ => DecodeError::InvalidLength(err.to_string()),
    }
}

/// Decode a bech32 or bech32m string into (hrp, 5-bit data, variant)
///
/// The returned prefix is lowercase and the checksum groups are stripped.
pub fn decode(encoded: &str) -> std::result::Result<(String, Vec<u8>, Variant), DecodeError> {
    let unchecked = UncheckedHrpstring::new(encoded).map_err(|e| parse_error(encoded, &e))?;

    if encoded.len() > MAX_LENGTH {
        return Err(DecodeError::InvalidLength(format!(
            "{} characters, maximum is {}",
            encoded.len(),
            MAX_LENGTH
        )));
    }

    let data_part = unchecked.data_part_ascii();
    if data_part.len() < CHECKSUM_LEN {
        return Err(DecodeError::InvalidLength(format!(
            "data part shorter than the {} checksum characters",
            CHECKSUM_LEN
        )));
    }

    let variant = if unchecked.has_valid_checksum::<bech32::Bech32>() {
        Variant::Bech32
    } else if unchecked.has_valid_checksum::<bech32::Bech32m>() {
        Variant::Bech32m
    } else {
        return Err(DecodeError::ChecksumMismatch(format!(
            "'{}' matches neither bech32 nor bech32m",
            encoded
        )));
    };

    let data = data_part[..data_part.len() - CHECKSUM_LEN]
        .iter()
        .map(|&c| Fe32::from_char_unchecked(c).to_u8())
        .collect();
    Ok((unchecked.hrp().to_lowercase(), data, variant))
}

/// Encode a witness version and program as a segwit address
///
/// The version is emitted as given (it only has to fit in 5 bits), so
/// out-of-range versions can be produced deliberately.
pub fn encode_segwit(hrp: &str, version: u8, program: &[u8], variant: Variant) -> Result<String> {
    let mut data = vec![version];
    data.extend(to_groups(program));
    encode(hrp, &data, variant)
}

/// Decode a segwit address for the expected prefix with strict checks
pub fn decode_segwit(
    expected_hrp: &str,
    encoded: &str,
) -> std::result::Result<WitnessProgram, DecodeError> {
    let (hrp, data, variant) = decode(encoded)?;
    if hrp != expected_hrp {
        return Err(DecodeError::HrpMismatch(format!(
            "expected '{}', got '{}'",
            expected_hrp, hrp
        )));
    }

    let (&version, groups) = data
        .split_first()
        .ok_or_else(|| DecodeError::InvalidLength("empty data part".to_string()))?;
    if version > MAX_WITNESS_VERSION {
        return Err(DecodeError::InvalidWitnessVersion(format!(
            "{} is above {}",
            version, MAX_WITNESS_VERSION
        )));
    }

    let program = from_groups(groups)?;
    if !(2..=40).contains(&program.len()) {
        return Err(DecodeError::InvalidLength(format!(
            "witness program of {} bytes",
            program.len()
        )));
    }
    if version == 0 && program.len() != 20 && program.len() != 32 {
        return Err(DecodeError::InvalidLength(format!(
            "version 0 program of {} bytes",
            program.len()
        )));
    }

    let required = Variant::for_witness_version(version);
    if variant != required {
        return Err(DecodeError::InvalidChecksumVariant(format!(
            "witness version {} requires {:?}, got {:?}",
            version, required, variant
        )));
    }

    Ok(WitnessProgram {
        hrp,
        version,
        program,
        variant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bip173_minimal_vector() {
        assert_eq!(encode("a", &[], Variant::Bech32).unwrap(), "a12uel5l");
        let (hrp, data, variant) = decode("A12UEL5L").unwrap();
        assert_eq!(hrp, "a");
        assert!(data.is_empty());
        assert_eq!(variant, Variant::Bech32);
    }

    #[test]
    fn test_golden_p2wpkh() {
        let encoded = encode_segwit("ltc", 0, &[0u8; 20], Variant::Bech32).unwrap();
        assert_eq!(encoded, "ltc1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqp9ysmq");

        let decoded = decode_segwit("ltc", &encoded).unwrap();
        assert_eq!(decoded.version, 0);
        assert_eq!(decoded.program, vec![0u8; 20]);
        assert_eq!(decoded.script_pubkey().unwrap()[..2], [0x00, 20]);
    }

    #[test]
    fn test_checksum_block_flip_fails() {
        let encoded = encode_segwit("ltc", 0, &[0u8; 20], Variant::Bech32).unwrap();
        let charset: Vec<char> = CHARSET.chars().collect();

        for i in encoded.len() - CHECKSUM_LEN..encoded.len() {
            let original = encoded.as_bytes()[i] as char;
            for &replacement in charset.iter().filter(|&&c| c != original) {
                let mut corrupted: Vec<char> = encoded.chars().collect();
                corrupted[i] = replacement;
                let corrupted: String = corrupted.into_iter().collect();
                assert!(decode_segwit("ltc", &corrupted).is_err(), "{}", corrupted);
            }
        }
    }

    #[test]
    fn test_variant_binding() {
        let v0_bech32m = encode_segwit("ltc", 0, &[0u8; 20], Variant::Bech32m).unwrap();
        assert_eq!(v0_bech32m, "ltc1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq5e5u7z");
        assert!(matches!(
            decode_segwit("ltc", &v0_bech32m),
            Err(DecodeError::InvalidChecksumVariant(_))
        ));

        let v1_bech32 = encode_segwit("ltc", 1, &[0u8; 32], Variant::Bech32).unwrap();
        assert!(matches!(
            decode_segwit("ltc", &v1_bech32),
            Err(DecodeError::InvalidChecksumVariant(_))
        ));

        let v1_bech32m = encode_segwit("ltc", 1, &[0u8; 32], Variant::Bech32m).unwrap();
        assert_eq!(
            v1_bech32m,
            "ltc1pqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqzywff7"
        );
        assert!(decode_segwit("ltc", &v1_bech32m).is_ok());
    }

    #[test]
    fn test_mixed_case_rejected() {
        let encoded = encode_segwit("ltc", 0, &[7u8; 20], Variant::Bech32).unwrap();
        let mut mixed = encoded.clone();
        mixed.replace_range(5..9, &encoded[5..9].to_uppercase());
        assert!(matches!(decode(&mixed), Err(DecodeError::MixedCase(_))));

        let upper = encoded.to_uppercase();
        assert_eq!(decode_segwit("ltc", &upper).unwrap().program, vec![7u8; 20]);
    }

    #[test]
    fn test_structural_failures() {
        let wrong_hrp = encode_segwit("tc", 0, &[1u8; 20], Variant::Bech32).unwrap();
        assert!(matches!(
            decode_segwit("ltc", &wrong_hrp),
            Err(DecodeError::HrpMismatch(_))
        ));

        let v17 = encode_segwit("ltc", 17, &[1u8; 32], Variant::Bech32m).unwrap();
        assert!(matches!(
            decode_segwit("ltc", &v17),
            Err(DecodeError::InvalidWitnessVersion(_))
        ));

        let short_v0 = encode_segwit("ltc", 0, &[1u8; 16], Variant::Bech32).unwrap();
        assert!(matches!(
            decode_segwit("ltc", &short_v0),
            Err(DecodeError::InvalidLength(_))
        ));

        let one_byte = encode_segwit("ltc", 3, &[1u8; 1], Variant::Bech32m).unwrap();
        assert!(matches!(
            decode_segwit("ltc", &one_byte),
            Err(DecodeError::InvalidLength(_))
        ));

        let no_data = encode("ltc", &[], Variant::Bech32).unwrap();
        assert!(matches!(
            decode_segwit("ltc", &no_data),
            Err(DecodeError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_invalid_padding() {
        let mut data = vec![0u8];
        data.extend(to_groups(&[0xffu8; 20]));
        data.push(0);
        let encoded = encode("ltc", &data, Variant::Bech32).unwrap();
        assert!(matches!(
            decode_segwit("ltc", &encoded),
            Err(DecodeError::InvalidPadding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_characters() {
        assert!(matches!(decode("ltc1qq"), Err(DecodeError::InvalidLength(_))));
        assert!(matches!(decode("ltc1b"), Err(DecodeError::InvalidCharacter(_))));
        assert!(matches!(decode("ltcqqqqqqqq"), Err(DecodeError::InvalidLength(_))));
        assert!(matches!(
            decode("ltc1qqqqqqqqqb"),
            Err(DecodeError::InvalidCharacter(_))
        ));
        assert!(matches!(
            decode("ltc1 qqqqqqq"),
            Err(DecodeError::InvalidCharacter(_))
        ));
        assert!(matches!(decode("1qqqqqqq"), Err(DecodeError::InvalidLength(_))));
    }

    #[test]
    fn test_encode_rejects_bad_input() {
        assert!(encode("", &[0], Variant::Bech32).is_err());
        assert!(encode("LTC", &[0], Variant::Bech32).is_err());
        assert!(encode("ltc", &[32], Variant::Bech32).is_err());
    }

    #[test]
    fn test_group_conversion_strict() {
        let groups = to_groups(&[0xff]);
        assert_eq!(groups, vec![31, 28]);
        assert_eq!(from_groups(&groups).unwrap(), vec![0xff]);
        assert!(from_groups(&[]).unwrap().is_empty());

        // Non-zero padding bits
        assert!(matches!(
            from_groups(&[31, 29]),
            Err(DecodeError::InvalidPadding(_))
        ));
        // A whole spare group
        assert!(matches!(from_groups(&[0]), Err(DecodeError::InvalidPadding(_))));
        assert!(matches!(
            from_groups(&[32, 0]),
            Err(DecodeError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_malformed_data_encodes_and_decodes() {
        // Version 17 with a bech32m checksum
        let mut data = vec![17u8];
        data.extend(to_groups(&[9u8; 32]));
        let encoded = encode("tltc", &data, Variant::Bech32m).unwrap();
        assert_eq!(decode(&encoded).unwrap(), ("tltc".to_string(), data, Variant::Bech32m));

        // Padding bit set on a 2-byte program
        let mut data = vec![1u8];
        data.extend(to_groups(&[0xab, 0xcd]));
        *data.last_mut().unwrap() |= 1;
        let encoded = encode("rltc", &data, Variant::Bech32m).unwrap();
        let (_, decoded, variant) = decode(&encoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(variant, Variant::Bech32m);
        assert!(matches!(
            decode_segwit("rltc", &encoded),
            Err(DecodeError::InvalidPadding(_))
        ));

        // Empty data part
        let encoded = encode("ltc", &[], Variant::Bech32).unwrap();
        assert_eq!(encoded.len(), "ltc".len() + 1 + CHECKSUM_LEN);
        assert_eq!(encoded.rfind(SEPARATOR), Some("ltc".len()));
        assert_eq!(decode(&encoded).unwrap(), ("ltc".to_string(), vec![], Variant::Bech32));
    }
}
