//! Output script skeletons
//!
//! Valid vectors pair an encoded string with the output script it stands
//! for. These are the opcode prefixes and suffixes wrapped around the raw
//! hash or witness program.

use crate::{Error, Result};

/// Push empty / witness version 0
pub const OP_0: u8 = 0x00;
/// Witness version 1
pub const OP_1: u8 = 0x51;
/// Witness version 2
pub const OP_2: u8 = 0x52;
/// Witness version 3
pub const OP_3: u8 = 0x53;
/// Witness version 16
pub const OP_16: u8 = 0x60;
#[allow(missing_docs)]
pub const OP_DUP: u8 = 0x76;
#[allow(missing_docs)]
pub const OP_EQUAL: u8 = 0x87;
#[allow(missing_docs)]
pub const OP_EQUALVERIFY: u8 = 0x88;
#[allow(missing_docs)]
pub const OP_HASH160: u8 = 0xa9;
#[allow(missing_docs)]
pub const OP_CHECKSIG: u8 = 0xac;

/// P2PKH: `OP_DUP OP_HASH160 <20>` ... `OP_EQUALVERIFY OP_CHECKSIG`
pub const P2PKH_PREFIX: &[u8] = &[OP_DUP, OP_HASH160, 20];
#[allow(missing_docs)]
pub const P2PKH_SUFFIX: &[u8] = &[OP_EQUALVERIFY, OP_CHECKSIG];

/// P2SH: `OP_HASH160 <20>` ... `OP_EQUAL`
pub const P2SH_PREFIX: &[u8] = &[OP_HASH160, 20];
#[allow(missing_docs)]
pub const P2SH_SUFFIX: &[u8] = &[OP_EQUAL];

/// Version 0 key hash program
pub const P2WPKH_PREFIX: &[u8] = &[OP_0, 20];
/// Version 0 script hash program
pub const P2WSH_PREFIX: &[u8] = &[OP_0, 32];
/// Version 1 taproot program
pub const P2TR_PREFIX: &[u8] = &[OP_1, 32];

/// Opcode pushing a witness version (OP_0, OP_1..OP_16)
pub fn witness_opcode(version: u8) -> Result<u8> {
    match version {
        0 => Ok(OP_0),
        1..=16 => Ok(OP_1 - 1 + version),
        _ => Err(Error::InvalidTemplate(format!(
            "no opcode for witness version {}",
            version
        ))),
    }
}
