/*
    This module contains the default imports for the library.

    Import the library using:
        use btc_keyscript::prelude::*;
    to quickly import the essential parts of the library.
*/

pub use crate::{
    address::Address,
    derive::{commit_key, commit_public_key, wp42_private_key, wp42_public_key},
    error::{Error, Result},
    hdwallet::{ChildIndex, ExtendedKey, ExtendedKeys, KeyMaterial, Path, HARDENED_OFFSET},
    key::Key,
    message::{message_digest, verify_message, CompactSignature},
    network::{Network, NetworkParams},
    public_key::PublicKey,
    raw_address::{MultiPkh, RawAddress, ScriptType},
    script::{Builder, Opcode, Script, ScriptItem, Template},
    signature::Signature,
};
