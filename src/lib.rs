/*
    Library for keys, signatures, hierarchical deterministic derivation
    and locking script / address templates on UTXO chains.

    Layers:
        - curve, key, public_key, signature: secp256k1 keys and deterministic ECDSA
        - message, derive: signed messages and key tweaking schemes
        - hdwallet: BIP32 extended keys
        - script, raw_address, address: script parsing, template matching
          and the network specific address encoding

    References:
        - The Bitcoin Book (https://github.com/bitcoinbook/bitcoinbook/)
        - BIP32 (https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki)
        - BIP276 (https://github.com/moneybutton/bips/blob/master/bip-0276.mediawiki)
*/

#[cfg(feature = "serde")]
extern crate serde_crate as serde;

//Outward facing modules
pub mod address;
pub mod derive;
pub mod encoding;
pub mod error;
pub mod hdwallet;
pub mod key;
pub mod message;
pub mod network;
pub mod prelude;
pub mod public_key;
pub mod raw_address;
pub mod script;
pub mod signature;

//Primitives
pub mod curve;
pub mod hash;

//Trait boilerplate
mod impls;

pub use error::{Error, Result};
