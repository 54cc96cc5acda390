//! Chain parameters for key/address test vector generation
//!
//! This crate provides the per-chain version bytes and bech32 human-readable
//! prefixes that the vector templates are built from.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chain;

pub use chain::{known_hrps, Chain, ChainParams};
