//! Base58-check encoding
//!
//! Payloads get a 4-byte checksum (first four bytes of a double SHA-256)
//! appended before being mapped through the Bitcoin base58 alphabet. Each
//! leading zero byte maps to one leading `1`.

use crate::DecodeError;
use sha2::{Digest, Sha256};

/// Base58 alphabet (Bitcoin ordering)
pub const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Checksum length in bytes
pub const CHECKSUM_LEN: usize = 4;

/// Encode raw bytes without a checksum
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode a base58 string without checking a checksum
pub fn decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    bs58::decode(encoded).into_vec().map_err(|e| match e {
        bs58::decode::Error::InvalidCharacter { character, index } => DecodeError::InvalidCharacter(
            format!("'{}' at position {} is not in the base58 alphabet", character, index),
        ),
        bs58::decode::Error::NonAsciiCharacter { index } => {
            DecodeError::InvalidCharacter(format!("non-ASCII character at position {}", index))
        }
        other => DecodeError::InvalidCharacter(other.to_string()),
    })
}

/// First four bytes of SHA256(SHA256(data))
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash[..CHECKSUM_LEN]);
    out
}

/// Encode a payload with its checksum appended
pub fn encode_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    encode(&data)
}

/// Decode a base58-check string and verify its checksum
pub fn decode_check(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let mut data = decode(encoded)?;
    if data.len() < CHECKSUM_LEN {
        return Err(DecodeError::InvalidLength(format!(
            "decoded {} bytes, need at least {} for the checksum",
            data.len(),
            CHECKSUM_LEN
        )));
    }

    let split = data.len() - CHECKSUM_LEN;
    let expected = checksum(&data[..split]);
    if data[split..] != expected {
        return Err(DecodeError::ChecksumMismatch(format!(
            "expected {}, got {}",
            hex::encode(expected),
            hex::encode(&data[split..])
        )));
    }

    data.truncate(split);
    Ok(data)
}
