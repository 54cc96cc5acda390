//! Template tables
//!
//! A template is an immutable recipe for one shape of encoded string. Valid
//! base58 and bech32 templates describe strings a decoder must accept;
//! invalid bech32 templates describe structurally broken ones.

use crate::script::{
    witness_opcode, OP_16, OP_2, OP_3, P2PKH_PREFIX, P2PKH_SUFFIX, P2SH_PREFIX, P2SH_SUFFIX,
    P2TR_PREFIX, P2WPKH_PREFIX, P2WSH_PREFIX,
};
use crate::segwit::{Variant, MAX_WITNESS_VERSION};
use crate::{Error, Result};
use keyio_params::{Chain, ChainParams};
use serde::{Deserialize, Serialize};

/// Hash length of P2PKH/P2SH payloads
pub const HASH_LEN: usize = 20;

/// Private key length
pub const SECRET_KEY_LEN: usize = 32;

/// Suffix marking a private key whose public key is compressed
pub const COMPRESSED_SUFFIX: &[u8] = &[0x01];

/// Metadata carried unchanged into valid records
///
/// Fields are declared in key order so the serialized object is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Chain the string belongs to
    pub chain: Chain,
    /// Whether a private key is for a compressed public key
    #[serde(
        rename = "isCompressed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_compressed: Option<bool>,
    /// Whether the string is a private key rather than an address
    #[serde(rename = "isPrivkey")]
    pub is_privkey: bool,
    /// Whether a case-flipped copy must decode identically
    #[serde(
        rename = "tryCaseFlip",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub try_case_flip: Option<bool>,
}

impl Metadata {
    /// Address metadata
    pub const fn address(chain: Chain) -> Self {
        Self {
            chain,
            is_compressed: None,
            is_privkey: false,
            try_case_flip: None,
        }
    }

    /// Private key metadata
    pub const fn private_key(chain: Chain, compressed: bool) -> Self {
        Self {
            chain,
            is_compressed: Some(compressed),
            is_privkey: true,
            try_case_flip: None,
        }
    }

    /// Witness address metadata (case-insensitive encoding)
    pub const fn witness(chain: Chain) -> Self {
        Self {
            chain,
            is_compressed: None,
            is_privkey: false,
            try_case_flip: Some(true),
        }
    }
}

/// Base58-check template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base58Template {
    /// Version bytes placed before the payload
    pub prefix: Vec<u8>,
    /// Random payload length
    pub payload_len: usize,
    /// Bytes placed after the payload
    pub suffix: Vec<u8>,
    /// Metadata for the record
    pub metadata: Metadata,
    /// Expected-output bytes placed before the payload
    pub output_prefix: Vec<u8>,
    /// Expected-output bytes placed after the payload
    pub output_suffix: Vec<u8>,
}

impl Base58Template {
    fn address(version: u8, chain: Chain, output_prefix: &[u8], output_suffix: &[u8]) -> Self {
        Self {
            prefix: vec![version],
            payload_len: HASH_LEN,
            suffix: Vec::new(),
            metadata: Metadata::address(chain),
            output_prefix: output_prefix.to_vec(),
            output_suffix: output_suffix.to_vec(),
        }
    }

    fn private_key(params: &ChainParams, compressed: bool) -> Self {
        Self {
            prefix: vec![params.secret_key],
            payload_len: SECRET_KEY_LEN,
            suffix: if compressed {
                COMPRESSED_SUFFIX.to_vec()
            } else {
                Vec::new()
            },
            metadata: Metadata::private_key(params.chain, compressed),
            output_prefix: Vec::new(),
            output_suffix: Vec::new(),
        }
    }

    /// Check the template can be assembled
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(Error::InvalidTemplate(
                "base58 template without version prefix".to_string(),
            ));
        }
        if self.payload_len == 0 {
            return Err(Error::InvalidTemplate(
                "base58 template with empty payload".to_string(),
            ));
        }
        Ok(())
    }
}

/// Valid bech32/bech32m template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32Template {
    /// Human-readable prefix
    pub hrp: &'static str,
    /// Witness version
    pub witness_version: u8,
    /// Witness program length in bytes
    pub program_len: usize,
    /// Metadata for the record
    pub metadata: Metadata,
    /// Checksum variant
    pub variant: Variant,
    /// Script skeleton placed before the program in the expected output
    pub output_prefix: Vec<u8>,
}

impl Bech32Template {
    fn new(
        params: &ChainParams,
        witness_version: u8,
        program_len: usize,
        variant: Variant,
        output_prefix: &[u8],
    ) -> Self {
        Self {
            hrp: params.bech32_hrp,
            witness_version,
            program_len,
            metadata: Metadata::witness(params.chain),
            variant,
            output_prefix: output_prefix.to_vec(),
        }
    }

    /// Check the template describes a string a strict decoder accepts
    pub fn validate(&self) -> Result<()> {
        validate_hrp(self.hrp)?;
        if self.witness_version > MAX_WITNESS_VERSION {
            return Err(Error::InvalidTemplate(format!(
                "witness version {} in valid template",
                self.witness_version
            )));
        }
        if !(2..=40).contains(&self.program_len) {
            return Err(Error::InvalidTemplate(format!(
                "witness program length {} in valid template",
                self.program_len
            )));
        }
        if self.witness_version == 0 && self.program_len != 20 && self.program_len != 32 {
            return Err(Error::InvalidTemplate(format!(
                "version 0 program length {} in valid template",
                self.program_len
            )));
        }
        if self.variant != Variant::for_witness_version(self.witness_version) {
            return Err(Error::InvalidTemplate(format!(
                "{:?} checksum for witness version {}",
                self.variant, self.witness_version
            )));
        }

        let expected = [witness_opcode(self.witness_version)?, self.program_len as u8];
        if self.output_prefix != expected {
            return Err(Error::InvalidTemplate(format!(
                "output prefix {} does not match version {} program of {} bytes",
                hex::encode(&self.output_prefix),
                self.witness_version,
                self.program_len
            )));
        }
        Ok(())
    }
}

/// Negative bech32 template
///
/// The shape itself may already be invalid (wrong prefix, version out of
/// range, bad length, variant mismatch); the switches add string-level
/// corruption on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32InvalidTemplate {
    /// Human-readable prefix
    pub hrp: &'static str,
    /// Witness version (may exceed 16)
    pub witness_version: u8,
    /// Witness program length in bytes
    pub program_len: usize,
    /// Checksum variant
    pub variant: Variant,
    /// Emit a non-canonical 8-to-5 bit regrouping
    pub invalid_encoding: bool,
    /// Replace one checksum character
    pub corrupt_checksum: bool,
    /// Uppercase a window of the data part
    pub corrupt_case: bool,
}

impl Bech32InvalidTemplate {
    const fn shape(hrp: &'static str, witness_version: u8, program_len: usize, variant: Variant) -> Self {
        Self {
            hrp,
            witness_version,
            program_len,
            variant,
            invalid_encoding: false,
            corrupt_checksum: false,
            corrupt_case: false,
        }
    }

    fn with_invalid_encoding(mut self) -> Self {
        self.invalid_encoding = true;
        self
    }

    fn with_corrupt_checksum(mut self) -> Self {
        self.corrupt_checksum = true;
        self
    }

    fn with_corrupt_case(mut self) -> Self {
        self.corrupt_case = true;
        self
    }

    /// Check the template can be encoded at all
    pub fn validate(&self) -> Result<()> {
        validate_hrp(self.hrp)?;
        if self.witness_version > 31 {
            return Err(Error::InvalidTemplate(format!(
                "witness version {} does not fit in 5 bits",
                self.witness_version
            )));
        }
        Ok(())
    }
}

fn validate_hrp(hrp: &str) -> Result<()> {
    if hrp.is_empty() || !hrp.bytes().all(|b| (33..=126).contains(&b) && !b.is_ascii_uppercase()) {
        return Err(Error::InvalidTemplate(format!(
            "human-readable prefix '{}' is not lowercase printable ASCII",
            hrp
        )));
    }
    Ok(())
}

/// One generation recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Base58-check address or private key
    Base58(Base58Template),
    /// Valid witness address
    Bech32(Bech32Template),
    /// Negative witness address
    Bech32Invalid(Bech32InvalidTemplate),
}

impl Template {
    /// Templates cycled in valid mode: base58 first, then bech32
    pub fn valid_set() -> Vec<Template> {
        base58_templates()
            .into_iter()
            .map(Template::Base58)
            .chain(bech32_templates().into_iter().map(Template::Bech32))
            .collect()
    }

    /// Templates cycled in invalid mode: base58 first, then negative bech32
    pub fn invalid_set() -> Vec<Template> {
        base58_templates()
            .into_iter()
            .map(Template::Base58)
            .chain(
                bech32_invalid_templates()
                    .into_iter()
                    .map(Template::Bech32Invalid),
            )
            .collect()
    }

    /// Validate whichever template this is
    pub fn validate(&self) -> Result<()> {
        match self {
            Template::Base58(t) => t.validate(),
            Template::Bech32(t) => t.validate(),
            Template::Bech32Invalid(t) => t.validate(),
        }
    }

    /// Short kind name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Template::Base58(_) => "base58",
            Template::Bech32(_) => "bech32",
            Template::Bech32Invalid(_) => "bech32-invalid",
        }
    }
}

/// Base58 templates: every chain's addresses, then every chain's private keys
pub fn base58_templates() -> Vec<Base58Template> {
    let mut templates = Vec::new();

    for chain in Chain::all() {
        let params = chain.params();
        templates.push(Base58Template::address(
            params.pubkey_address,
            chain,
            P2PKH_PREFIX,
            P2PKH_SUFFIX,
        ));
        templates.push(Base58Template::address(
            params.script_address,
            chain,
            P2SH_PREFIX,
            P2SH_SUFFIX,
        ));
        if let Some(version) = params.script_address2 {
            templates.push(Base58Template::address(
                version,
                chain,
                P2SH_PREFIX,
                P2SH_SUFFIX,
            ));
        }
    }

    for chain in Chain::all() {
        let params = chain.params();
        templates.push(Base58Template::private_key(&params, false));
        templates.push(Base58Template::private_key(&params, true));
    }

    templates
}

/// Valid witness templates: v0 key hash, v0 script hash, taproot, and one
/// chain-specific future version each
pub fn bech32_templates() -> Vec<Bech32Template> {
    let future: [(Chain, u8, usize, u8); 4] = [
        (Chain::Main, 2, 2, OP_2),
        (Chain::Test, 3, 16, OP_3),
        (Chain::Signet, 3, 32, OP_3),
        (Chain::Regtest, 16, 40, OP_16),
    ];

    let mut templates = Vec::new();
    for (chain, version, len, opcode) in future {
        let params = chain.params();
        templates.push(Bech32Template::new(&params, 0, 20, Variant::Bech32, P2WPKH_PREFIX));
        templates.push(Bech32Template::new(&params, 0, 32, Variant::Bech32, P2WSH_PREFIX));
        templates.push(Bech32Template::new(&params, 1, 32, Variant::Bech32m, P2TR_PREFIX));
        templates.push(Bech32Template::new(
            &params,
            version,
            len,
            Variant::Bech32m,
            &[opcode, len as u8],
        ));
    }
    templates
}

/// Negative witness templates
pub fn bech32_invalid_templates() -> Vec<Bech32InvalidTemplate> {
    use crate::segwit::Variant::{Bech32, Bech32m};
    type T = Bech32InvalidTemplate;

    vec![
        // Unknown prefixes
        T::shape("tc", 0, 20, Bech32),
        T::shape("bt", 1, 32, Bech32m),
        // Witness version out of range
        T::shape("tltc", 17, 32, Bech32m),
        // Program lengths outside protocol bounds
        T::shape("rltc", 3, 1, Bech32m),
        T::shape("ltc", 15, 41, Bech32m),
        T::shape("tltc", 0, 16, Bech32),
        // Non-canonical regrouping
        T::shape("rltc", 0, 32, Bech32).with_invalid_encoding(),
        T::shape("ltc", 0, 16, Bech32).with_invalid_encoding(),
        // String-level corruption
        T::shape("tltc", 0, 32, Bech32).with_corrupt_checksum(),
        T::shape("rltc", 0, 20, Bech32).with_corrupt_case(),
        // Checksum variant does not match the version
        T::shape("ltc", 0, 20, Bech32m),
        T::shape("tltc", 0, 32, Bech32m),
        T::shape("rltc", 0, 20, Bech32m),
        T::shape("ltc", 1, 32, Bech32),
        T::shape("tltc", 2, 16, Bech32),
        T::shape("rltc", 16, 20, Bech32),
    ]
}
