//! Valid and invalid vector generation
//!
//! Every entry point takes the random source explicitly, so a seeded
//! generator reproduces the same corpus. Payload bytes and corruption
//! decisions are drawn from the same handle.

use crate::base58;
use crate::record::{InvalidRecord, ValidRecord};
use crate::segwit::{self, CHARSET};
use crate::template::{
    base58_templates, Base58Template, Bech32InvalidTemplate, Bech32Template, Template,
};
use crate::validate::{is_valid_base58_with, is_valid_bech32, matching_base58_template};
use crate::{Error, Result};
use rand::distributions::Distribution;
use rand::Rng;
use std::collections::VecDeque;

/// Still-valid candidates in a row after which invalid generation gives up
pub const MAX_CONSECUTIVE_DISCARDS: usize = 1000;

/// Probability of each independent base58 corruption
const CORRUPT_PROBABILITY: f64 = 0.2;

/// Probability of corrupting the encoded base58 string itself
const LINE_CORRUPT_PROBABILITY: f64 = 0.1;

/// Probability of encoding an empty bech32 data part
const NO_DATA_PROBABILITY: f64 = 0.1;

/// Probability of swapping the case of a whole bech32 string
const SWAP_CASE_PROBABILITY: f64 = 0.1;

/// Rate of the exponential draw for randomized payload lengths
const PAYLOAD_LEN_RATE: f64 = 0.5;

/// Floor applied to randomized payload lengths
const MIN_RANDOM_PAYLOAD_LEN: usize = 50;

/// Strings every invalid corpus starts with
const INVALID_EDGE_CASES: [&str; 2] = ["", "x"];

fn random_bytes<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}

fn random_char<R: Rng + ?Sized>(rng: &mut R, alphabet: &str) -> char {
    let bytes = alphabet.as_bytes();
    bytes[rng.gen_range(0..bytes.len())] as char
}

/// Randomized payload length: `max(floor(Exp(0.5)), 50)`
#[derive(Debug, Clone, Copy)]
struct PayloadLen;

impl Distribution<usize> for PayloadLen {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        // Inverse CDF over (0, 1]
        let u: f64 = 1.0 - rng.gen::<f64>();
        let sample = -u.ln() / PAYLOAD_LEN_RATE;
        (sample as usize).max(MIN_RANDOM_PAYLOAD_LEN)
    }
}

fn swap_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}

/// Generate a valid base58-check vector
///
/// The string encodes `prefix + payload + suffix`; the record carries
/// `output_prefix + payload + output_suffix`.
pub fn valid_base58_vector<R: Rng + ?Sized>(
    rng: &mut R,
    template: &Base58Template,
) -> Result<ValidRecord> {
    let payload = random_bytes(rng, template.payload_len);

    let mut raw = template.prefix.clone();
    raw.extend_from_slice(&payload);
    raw.extend_from_slice(&template.suffix);
    let encoded = base58::encode_check(&raw);

    let decoded = base58::decode_check(&encoded)
        .map_err(|e| Error::Internal(format!("fresh base58 vector does not decode: {}", e)))?;
    let matches_template =
        matching_base58_template(&decoded, std::slice::from_ref(template)).is_some();
    if decoded != raw || !matches_template {
        return Err(Error::Internal(format!(
            "base58 vector {} does not round-trip",
            encoded
        )));
    }

    let mut expected = template.output_prefix.clone();
    expected.extend_from_slice(&payload);
    expected.extend_from_slice(&template.output_suffix);

    Ok(ValidRecord {
        encoded,
        payload: expected,
        metadata: template.metadata,
    })
}

/// Generate a valid bech32/bech32m witness address vector
///
/// The record carries the output script: `output_prefix + program`.
pub fn valid_bech32_vector<R: Rng + ?Sized>(
    rng: &mut R,
    template: &Bech32Template,
) -> Result<ValidRecord> {
    let program = random_bytes(rng, template.program_len);
    let encoded =
        segwit::encode_segwit(template.hrp, template.witness_version, &program, template.variant)?;

    let mut expected = template.output_prefix.clone();
    expected.extend_from_slice(&program);

    let decoded = segwit::decode_segwit(template.hrp, &encoded)
        .map_err(|e| Error::Internal(format!("fresh bech32 vector does not decode: {}", e)))?;
    if decoded.script_pubkey()? != expected {
        return Err(Error::Internal(format!(
            "bech32 vector {} does not round-trip",
            encoded
        )));
    }

    Ok(ValidRecord {
        encoded,
        payload: expected,
        metadata: template.metadata,
    })
}

/// Generate a possibly invalid base58-check string
///
/// Prefix, payload length and suffix are each replaced with probability
/// 0.2 and encoded with a correct checksum. With probability 0.1 the string
/// itself is then altered by appending or overwriting one character.
pub fn invalid_base58_vector<R: Rng + ?Sized>(
    rng: &mut R,
    template: &Base58Template,
) -> Result<String> {
    let corrupt_prefix = rng.gen_bool(CORRUPT_PROBABILITY);
    let randomize_payload_len = rng.gen_bool(CORRUPT_PROBABILITY);
    let corrupt_suffix = rng.gen_bool(CORRUPT_PROBABILITY);

    let mut raw = if corrupt_prefix {
        random_bytes(rng, 1)
    } else {
        template.prefix.clone()
    };

    let payload_len = if randomize_payload_len {
        rng.sample(PayloadLen)
    } else {
        template.payload_len
    };
    raw.extend(random_bytes(rng, payload_len));

    if corrupt_suffix {
        raw.extend(random_bytes(rng, template.suffix.len()));
    } else {
        raw.extend_from_slice(&template.suffix);
    }

    let mut encoded = base58::encode_check(&raw);

    if rng.gen_bool(LINE_CORRUPT_PROBABILITY) {
        let ch = random_char(rng, base58::ALPHABET);
        if rng.gen_bool(0.5) {
            encoded.push(ch);
        } else {
            let n = rng.gen_range(0..=encoded.len());
            let end = (n + 1).min(encoded.len());
            encoded.replace_range(n..end, ch.encode_utf8(&mut [0u8; 4]));
        }
    }

    Ok(encoded)
}

/// Generate a possibly invalid bech32 string from a negative template
///
/// The string is always encoded first; corruption is applied to the
/// encoded form.
pub fn invalid_bech32_vector<R: Rng + ?Sized>(
    rng: &mut R,
    template: &Bech32InvalidTemplate,
) -> Result<String> {
    let no_data = rng.gen_bool(NO_DATA_PROBABILITY);
    let to_upper = rng.gen_bool(SWAP_CASE_PROBABILITY);
    let program = random_bytes(rng, template.program_len);

    let mut encoded = if no_data {
        segwit::encode(template.hrp, &[], template.variant)?
    } else {
        let mut data = vec![template.witness_version];
        data.extend(segwit::to_groups(&program));
        if template.invalid_encoding {
            if matches!(template.program_len % 5, 2 | 4) {
                // Set a padding bit
                if let Some(last) = data.last_mut() {
                    *last |= 1;
                }
            } else {
                // Add a group a strict repack cannot absorb
                data.push(0);
            }
        }
        segwit::encode(template.hrp, &data, template.variant)?
    };

    if template.corrupt_checksum {
        let i = encoded.len() - rng.gen_range(1..=segwit::CHECKSUM_LEN);
        let current = encoded.as_bytes()[i] as char;
        let choices: String = CHARSET.chars().filter(|&c| c != current).collect();
        let replacement = random_char(rng, &choices);
        encoded.replace_range(i..i + 1, replacement.encode_utf8(&mut [0u8; 4]));
    }

    if template.corrupt_case {
        let span = encoded.len() - template.hrp.len() - 4;
        let start = template.hrp.len() + 1 + rng.gen_range(0..span);
        let end = (start + 4).min(encoded.len());
        let upper = encoded[start..end].to_ascii_uppercase();
        encoded.replace_range(start..end, &upper);
    }

    if to_upper {
        encoded = swap_case(&encoded);
    }

    Ok(encoded)
}

fn validated(templates: Vec<Template>) -> Result<Vec<Template>> {
    if templates.is_empty() {
        return Err(Error::InvalidTemplate("empty template table".to_string()));
    }
    for template in &templates {
        template.validate()?;
    }
    Ok(templates)
}

/// Endless stream of valid records, cycling through the valid templates
pub struct ValidVectors<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    templates: Vec<Template>,
    next: usize,
}

impl<'a, R: Rng + ?Sized> ValidVectors<'a, R> {
    /// Create a stream over the built-in valid templates
    pub fn new(rng: &'a mut R) -> Result<Self> {
        Self::with_templates(rng, Template::valid_set())
    }

    /// Create a stream over custom templates
    pub fn with_templates(rng: &'a mut R, templates: Vec<Template>) -> Result<Self> {
        Ok(Self {
            rng,
            templates: validated(templates)?,
            next: 0,
        })
    }
}

impl<R: Rng + ?Sized> Iterator for ValidVectors<'_, R> {
    type Item = Result<ValidRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let template = &self.templates[self.next % self.templates.len()];
        self.next += 1;

        let record = match template {
            Template::Base58(t) => valid_base58_vector(&mut *self.rng, t),
            Template::Bech32(t) => valid_bech32_vector(&mut *self.rng, t),
            Template::Bech32Invalid(_) => Err(Error::InvalidTemplate(
                "negative template in valid mode".to_string(),
            )),
        };

        if let Ok(record) = &record {
            tracing::debug!("Generated valid {} vector {}", template.kind(), record.encoded);
        }
        Some(record)
    }
}

/// Endless stream of invalid records
///
/// Starts with the fixed edge cases, then cycles through the invalid
/// templates. Candidates that still decode as valid for some template or
/// known chain are discarded.
pub struct InvalidVectors<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    templates: Vec<Template>,
    oracle: Vec<Base58Template>,
    edge_cases: VecDeque<&'static str>,
    discard_limit: usize,
    next: usize,
}

impl<'a, R: Rng + ?Sized> InvalidVectors<'a, R> {
    /// Create a stream over the built-in invalid templates
    pub fn new(rng: &'a mut R) -> Result<Self> {
        Self::with_templates(rng, Template::invalid_set())
    }

    /// Create a stream over custom templates
    pub fn with_templates(rng: &'a mut R, templates: Vec<Template>) -> Result<Self> {
        Ok(Self {
            rng,
            templates: validated(templates)?,
            oracle: base58_templates(),
            edge_cases: INVALID_EDGE_CASES.into_iter().collect(),
            discard_limit: MAX_CONSECUTIVE_DISCARDS,
            next: 0,
        })
    }

    /// Give up after `limit` still-valid candidates in a row
    pub fn with_discard_limit(mut self, limit: usize) -> Self {
        self.discard_limit = limit.max(1);
        self
    }

    fn candidate(&mut self) -> Result<(String, &'static str)> {
        let template = &self.templates[self.next % self.templates.len()];
        self.next += 1;

        let encoded = match template {
            Template::Base58(t) => invalid_base58_vector(&mut *self.rng, t)?,
            Template::Bech32Invalid(t) => invalid_bech32_vector(&mut *self.rng, t)?,
            Template::Bech32(_) => {
                return Err(Error::InvalidTemplate(
                    "valid bech32 template in invalid mode".to_string(),
                ))
            }
        };
        Ok((encoded, template.kind()))
    }

    fn is_still_valid(&self, encoded: &str) -> bool {
        is_valid_base58_with(encoded, &self.oracle) || is_valid_bech32(encoded)
    }
}

impl<R: Rng + ?Sized> Iterator for InvalidVectors<'_, R> {
    type Item = Result<InvalidRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(edge) = self.edge_cases.pop_front() {
            return Some(Ok(InvalidRecord {
                encoded: edge.to_string(),
            }));
        }

        let mut discarded = 0;
        loop {
            let (encoded, kind) = match self.candidate() {
                Ok(candidate) => candidate,
                Err(e) => return Some(Err(e)),
            };

            if !self.is_still_valid(&encoded) {
                tracing::debug!("Generated invalid {} vector {:?}", kind, encoded);
                return Some(Ok(InvalidRecord { encoded }));
            }

            discarded += 1;
            tracing::debug!("Discarded {} candidate {} (still valid)", kind, encoded);
            if discarded >= self.discard_limit {
                return Some(Err(Error::Internal(format!(
                    "{} consecutive candidates decoded as valid",
                    discarded
                ))));
            }
        }
    }
}

/// Generate `count` valid records
pub fn generate_valid<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Result<Vec<ValidRecord>> {
    let records = ValidVectors::new(rng)?
        .take(count)
        .collect::<Result<Vec<_>>>()?;
    tracing::info!("Generated {} valid vectors", records.len());
    Ok(records)
}

/// Generate `count` invalid records
pub fn generate_invalid<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Result<Vec<InvalidRecord>> {
    let records = InvalidVectors::new(rng)?
        .take(count)
        .collect::<Result<Vec<_>>>()?;
    tracing::info!("Generated {} invalid vectors", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segwit::Variant;
    use crate::template::{bech32_invalid_templates, bech32_templates};
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_valid_base58_payload_uses_output_skeleton() {
        let mut rng = StdRng::seed_from_u64(1);
        let template = &base58_templates()[0];
        let record = valid_base58_vector(&mut rng, template).unwrap();

        assert_eq!(record.payload.len(), 25);
        assert_eq!(record.payload[..3], [0x76, 0xa9, 20]);
        assert_eq!(record.payload[23..], [0x88, 0xac]);

        let decoded = base58::decode_check(&record.encoded).unwrap();
        assert_eq!(decoded[0], 48);
        assert_eq!(decoded[1..], record.payload[3..23]);
    }

    #[test]
    fn test_valid_bech32_payload_is_script() {
        let mut rng = StdRng::seed_from_u64(2);
        for template in bech32_templates() {
            let record = valid_bech32_vector(&mut rng, &template).unwrap();
            let decoded = segwit::decode_segwit(template.hrp, &record.encoded).unwrap();
            assert_eq!(decoded.script_pubkey().unwrap(), record.payload);
            assert_eq!(record.metadata.try_case_flip, Some(true));
        }
    }

    #[test]
    fn test_valid_stream_cycles_templates() {
        let mut rng = StdRng::seed_from_u64(3);
        let records = generate_valid(&mut rng, 70).unwrap();
        assert_eq!(records.len(), 70);

        // Record 34 starts the second cycle with the first template again
        assert_eq!(Template::valid_set().len(), 34);
        assert_eq!(records[0].metadata, records[34].metadata);
        assert_eq!(records[0].payload[..3], records[34].payload[..3]);

        // Eight private key templates per cycle; the last two records are addresses
        assert_eq!(records.iter().filter(|r| r.metadata.is_privkey).count(), 16);
    }

    #[test]
    fn test_invalid_stream_starts_with_edge_cases() {
        let mut rng = StdRng::seed_from_u64(4);
        let records = generate_invalid(&mut rng, 2).unwrap();
        assert_eq!(records[0].encoded, "");
        assert_eq!(records[1].encoded, "x");
    }

    #[test]
    fn test_invalid_stream_never_valid() {
        let mut rng = StdRng::seed_from_u64(5);
        let oracle = base58_templates();
        for record in generate_invalid(&mut rng, 300).unwrap() {
            assert!(!is_valid_base58_with(&record.encoded, &oracle), "{}", record.encoded);
            assert!(!is_valid_bech32(&record.encoded), "{}", record.encoded);
        }
    }

    #[test]
    fn test_invalid_bech32_switches() {
        let mut rng = StdRng::seed_from_u64(6);
        for template in bech32_invalid_templates() {
            for _ in 0..20 {
                let encoded = invalid_bech32_vector(&mut rng, &template).unwrap();
                assert!(!is_valid_bech32(&encoded) || template.corrupt_case, "{}", encoded);
            }
        }
    }

    #[test]
    fn test_invalid_encoding_breaks_strict_repack() {
        let mut rng = StdRng::seed_from_u64(7);
        let template = bech32_invalid_templates()
            .into_iter()
            .find(|t| t.invalid_encoding && t.program_len == 32)
            .unwrap();

        for _ in 0..20 {
            let encoded = invalid_bech32_vector(&mut rng, &template).unwrap();
            assert!(segwit::decode_segwit("rltc", &encoded).is_err());
        }
    }

    #[test]
    fn test_random_payload_len_floor() {
        let mut rng = StdRng::seed_from_u64(8);
        let lens: Vec<usize> = PayloadLen.sample_iter(&mut rng).take(1000).collect();
        assert!(lens.iter().all(|&len| len >= MIN_RANDOM_PAYLOAD_LEN));

        // Both ends of the unit interval give finite lengths
        assert_eq!(StepRng::new(0, 0).sample(PayloadLen), MIN_RANDOM_PAYLOAD_LEN);
        assert_eq!(StepRng::new(u64::MAX, 0).sample(PayloadLen), 73);
    }

    #[test]
    fn test_discard_limit_aborts_generation() {
        // An all-ones source never triggers a corruption, so a well-formed
        // shape keeps producing addresses that are still valid
        let template = Bech32InvalidTemplate {
            hrp: "ltc",
            witness_version: 0,
            program_len: 20,
            variant: Variant::Bech32,
            invalid_encoding: false,
            corrupt_checksum: false,
            corrupt_case: false,
        };
        let mut rng = StepRng::new(u64::MAX, 0);
        assert!(is_valid_bech32(&invalid_bech32_vector(&mut rng, &template).unwrap()));

        let mut stream =
            InvalidVectors::with_templates(&mut rng, vec![Template::Bech32Invalid(template)])
                .unwrap()
                .with_discard_limit(5);
        assert_eq!(stream.next().unwrap().unwrap().encoded, "");
        assert_eq!(stream.next().unwrap().unwrap().encoded, "x");
        match stream.next().unwrap() {
            Err(Error::Internal(msg)) => assert!(msg.starts_with("5 consecutive"), "{}", msg),
            other => panic!("expected the discard limit to abort, got {:?}", other),
        }
    }

    #[test]
    fn test_default_discard_limit() {
        let mut rng = StdRng::seed_from_u64(11);
        let stream = InvalidVectors::new(&mut rng).unwrap();
        assert_eq!(stream.discard_limit, MAX_CONSECUTIVE_DISCARDS);
    }

    #[test]
    fn test_swap_case() {
        assert_eq!(swap_case("ltc1QPZ"), "LTC1qpz");
    }

    #[test]
    fn test_mode_mismatch_rejected() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut stream =
            ValidVectors::with_templates(&mut rng, Template::invalid_set()).unwrap();
        // Base58 templates come first and are fine in either mode
        for _ in 0..18 {
            stream.next().unwrap().unwrap();
        }
        assert!(matches!(
            stream.next().unwrap(),
            Err(Error::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_empty_template_table_rejected() {
        let mut rng = StdRng::seed_from_u64(10);
        assert!(ValidVectors::with_templates(&mut rng, Vec::new()).is_err());
    }
}
