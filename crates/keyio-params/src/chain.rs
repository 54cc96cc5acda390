//! Chain definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain tag carried in vector metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Mainnet
    Main,
    /// Testnet
    Test,
    /// Signet
    Signet,
    /// Regtest (local development)
    Regtest,
}

impl Chain {
    /// All chains, in table order
    pub const fn all() -> [Chain; 4] {
        [Chain::Main, Chain::Test, Chain::Signet, Chain::Regtest]
    }

    /// Tag written to the `chain` metadata field
    pub const fn name(&self) -> &'static str {
        match self {
            Chain::Main => "main",
            Chain::Test => "test",
            Chain::Signet => "signet",
            Chain::Regtest => "regtest",
        }
    }

    /// Parameters for this chain
    pub const fn params(&self) -> ChainParams {
        ChainParams::for_chain(*self)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Address and key encoding parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    /// Chain these parameters belong to
    pub chain: Chain,
    /// Base58 P2PKH version byte
    pub pubkey_address: u8,
    /// Base58 P2SH version byte
    pub script_address: u8,
    /// Secondary P2SH version byte, if the chain has one
    pub script_address2: Option<u8>,
    /// Base58 private key (WIF) version byte
    pub secret_key: u8,
    /// Bech32 human-readable prefix
    pub bech32_hrp: &'static str,
}

impl ChainParams {
    /// Mainnet parameters
    pub const fn main() -> Self {
        Self {
            chain: Chain::Main,
            pubkey_address: 48,
            script_address: 5,
            script_address2: Some(50),
            secret_key: 176,
            bech32_hrp: "ltc",
        }
    }

    /// Testnet parameters
    pub const fn test() -> Self {
        Self {
            chain: Chain::Test,
            pubkey_address: 111,
            script_address: 196,
            script_address2: Some(58),
            secret_key: 239,
            bech32_hrp: "tltc",
        }
    }

    /// Signet parameters (shares testnet prefixes)
    pub const fn signet() -> Self {
        Self {
            chain: Chain::Signet,
            pubkey_address: 111,
            script_address: 196,
            script_address2: None,
            secret_key: 239,
            bech32_hrp: "tltc",
        }
    }

    /// Regtest parameters
    pub const fn regtest() -> Self {
        Self {
            chain: Chain::Regtest,
            pubkey_address: 111,
            script_address: 196,
            script_address2: None,
            secret_key: 239,
            bech32_hrp: "rltc",
        }
    }

    /// Get parameters by chain
    pub const fn for_chain(chain: Chain) -> Self {
        match chain {
            Chain::Main => Self::main(),
            Chain::Test => Self::test(),
            Chain::Signet => Self::signet(),
            Chain::Regtest => Self::regtest(),
        }
    }
}

/// Every distinct bech32 prefix a conformant decoder accepts
pub fn known_hrps() -> Vec<&'static str> {
    let mut hrps: Vec<&'static str> = Vec::new();
    for chain in Chain::all() {
        let hrp = chain.params().bech32_hrp;
        if !hrps.contains(&hrp) {
            hrps.push(hrp);
        }
    }
    hrps
}
