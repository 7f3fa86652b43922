/*
    Network parameters.

    A network only changes how values are rendered as text (WIF prefixes,
    address type bytes, extended key versions). The tables are constant and
    selected through `Network::params()`.
*/

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::raw_address::ScriptType;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    MainNet,
    TestNet,
}

/// Address type bytes for each script type that has an address form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTypes {
    pub pkh: u8,
    pub sh: u8,
    pub multi_pkh: u8,
    pub rph: u8,
    pub pk: u8,
    pub non_standard: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    pub name: &'static str,
    pub wif_prefix: u8,
    pub address_types: AddressTypes,
    /// Version bytes of the 78-byte BIP32 serialization
    pub xprv_version: [u8; 4],
    pub xpub_version: [u8; 4],
    /// Network byte of BIP0276 text encodings
    pub bip276_network: u8,
}

pub const MAIN_NET_PARAMS: NetworkParams = NetworkParams {
    name: "mainnet",
    wif_prefix: 0x80,
    address_types: AddressTypes {
        pkh: 0x00,
        sh: 0x05,
        multi_pkh: 0x76,
        rph: 0x7b,
        pk: 0x06,
        non_standard: 0x08,
    },
    xprv_version: [0x04, 0x88, 0xad, 0xe4],
    xpub_version: [0x04, 0x88, 0xb2, 0x1e],
    bip276_network: 0x01,
};

pub const TEST_NET_PARAMS: NetworkParams = NetworkParams {
    name: "testnet",
    wif_prefix: 0xef,
    address_types: AddressTypes {
        pkh: 0x6f,
        sh: 0xc4,
        multi_pkh: 0x78,
        rph: 0x7d,
        pk: 0x0e,
        non_standard: 0x10,
    },
    xprv_version: [0x04, 0x35, 0x83, 0x94],
    xpub_version: [0x04, 0x35, 0x87, 0xcf],
    bip276_network: 0x02,
};

impl Network {
    pub const ALL: [Network; 2] = [Network::MainNet, Network::TestNet];

    pub fn params(&self) -> &'static NetworkParams {
        match self {
            Network::MainNet => &MAIN_NET_PARAMS,
            Network::TestNet => &TEST_NET_PARAMS,
        }
    }

    pub fn from_wif_prefix(prefix: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|n| n.params().wif_prefix == prefix)
            .ok_or(Error::UnknownNetwork(prefix))
    }

    pub fn from_bip276(byte: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|n| n.params().bip276_network == byte)
            .ok_or(Error::UnknownNetwork(byte))
    }

    /**
        Returns the network and whether the version denotes a private key.
    */
    pub fn from_xkey_version(version: [u8; 4]) -> Result<(Self, bool)> {
        for n in Self::ALL {
            if n.params().xprv_version == version {
                return Ok((n, true));
            }
            if n.params().xpub_version == version {
                return Ok((n, false));
            }
        }
        Err(Error::UnknownVersion(version))
    }

    /// Address type byte for a script type, `None` for types without an address form
    pub fn address_type(&self, script_type: ScriptType) -> Option<u8> {
        let t = &self.params().address_types;
        match script_type {
            ScriptType::Pkh => Some(t.pkh),
            ScriptType::Sh => Some(t.sh),
            ScriptType::MultiPkh => Some(t.multi_pkh),
            ScriptType::Rph => Some(t.rph),
            ScriptType::Pk => Some(t.pk),
            ScriptType::NonStandard => Some(t.non_standard),
            ScriptType::Empty => None,
        }
    }

    /// Reverse lookup of an address type byte over every network
    pub fn from_address_type(byte: u8) -> Result<(Self, ScriptType)> {
        for n in Self::ALL {
            for st in ScriptType::ADDRESSABLE {
                if n.address_type(st) == Some(byte) {
                    return Ok((n, st));
                }
            }
        }
        Err(Error::UnknownAddressType(byte))
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::MainNet
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.params().name)
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Network::MainNet),
            "testnet" | "test" => Ok(Network::TestNet),
            _ => Err(Error::UnknownNetworkName(s.to_string())),
        }
    }
}
