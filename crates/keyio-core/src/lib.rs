//! Key and address encoding test vector generator
//!
//! This crate implements the base58-check and bech32/bech32m codecs, the
//! template tables describing valid encodings, and the generators that turn
//! those templates into valid and invalid fixtures for decoder test suites.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod base58;
pub mod error;
pub mod generator;
pub mod record;
pub mod script;
pub mod segwit;
pub mod template;
pub mod validate;

pub use error::{DecodeError, Error, ErrorCategory, Result};
pub use generator::{InvalidVectors, ValidVectors, MAX_CONSECUTIVE_DISCARDS};
pub use record::{emit, InvalidRecord, Style, ValidRecord};
pub use segwit::{Variant, WitnessProgram};
pub use template::{
    Base58Template, Bech32InvalidTemplate, Bech32Template, Metadata, Template,
};
pub use validate::{is_valid_base58, is_valid_bech32};

pub use keyio_params::{Chain, ChainParams};
