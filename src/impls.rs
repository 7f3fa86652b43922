/**
    This module combines all the boilerplate
    implementations of fmt::Display, FromStr and the optional
    serde adapters.
*/

use std::fmt;
use std::str::FromStr;

use crate::{
    address::Address,
    error::Error,
    key::Key,
    message::CompactSignature,
    public_key::PublicKey,
    raw_address::RawAddress,
    script::{Opcode, Script, Template},
    signature::Signature,
};

/*
    key module impls
*/
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_wif())
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Key::from_wif(s)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.serialize()))
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        PublicKey::from_bytes(&hex::decode(s)?)
    }
}

/*
    signature module impls
*/
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.to_der()))
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Signature::from_der(&hex::decode(s)?)
    }
}

impl fmt::Display for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl FromStr for CompactSignature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        CompactSignature::from_bytes(&hex::decode(s)?)
    }
}

/*
    script module impls
*/
impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "OP_UNKNOWN{}", self.into_u8()),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

impl FromStr for Script {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(Script::new(hex::decode(s)?))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.script(), f)
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(Template::new(s.parse()?))
    }
}

/*
    address module impls
*/
impl fmt::Display for RawAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl FromStr for RawAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        RawAddress::from_bytes(&hex::decode(s)?)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Address::from_base58(s)
    }
}

/*
    serde impls, through the text forms above
*/
#[cfg(feature = "serde")]
macro_rules! serde_string_impl {
    ($($name:ty),* $(,)?) => {
        $(
            impl serde::Serialize for $name {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> serde::Deserialize<'de> for $name {
                fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }
        )*
    };
}

#[cfg(feature = "serde")]
serde_string_impl!(
    Key,
    PublicKey,
    Signature,
    CompactSignature,
    Script,
    Template,
    RawAddress,
    Address,
    crate::network::Network,
    crate::hdwallet::ExtendedKey,
    crate::hdwallet::ExtendedKeys,
    crate::hdwallet::Path,
);
