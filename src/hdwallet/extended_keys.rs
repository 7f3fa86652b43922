/*
    An ordered list of extended keys deriving in lock-step, one per
    participant of a multi-key wallet. Every child of the list is the list
    of the children at the same index.

    Byte form: varint(count) | count * 75 byte custom extended key
*/

use std::fmt;
use std::str::FromStr;

use super::{
    extended_key::{ExtendedKey, CUSTOM_LEN},
    path::Path,
};
use crate::{
    encoding::{bip276, varint, Reader},
    error::{Error, Result},
    network::Network,
    public_key::PublicKey,
    raw_address::{MultiPkh, RawAddress},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeys(Vec<ExtendedKey>);

impl ExtendedKeys {
    /// At least one key, all on the same network
    pub fn new(keys: Vec<ExtendedKey>) -> Result<Self> {
        let first = keys.first().ok_or(Error::NotEnoughPublicKeys { needed: 1, got: 0 })?;
        if keys.iter().any(|k| k.network() != first.network()) {
            return Err(Error::WrongNetwork);
        }
        Ok(Self(keys))
    }

    pub fn keys(&self) -> &[ExtendedKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn network(&self) -> Network {
        self.0[0].network()
    }

    pub fn child_key(&self, index: u32) -> Result<Self> {
        Ok(Self(self.0.iter().map(|k| k.child_key(index)).collect::<Result<_>>()?))
    }

    pub fn derive(&self, path: &Path) -> Result<Self> {
        Ok(Self(self.0.iter().map(|k| k.derive(path)).collect::<Result<_>>()?))
    }

    pub fn child_key_for_path(&self, path: &str) -> Result<Self> {
        self.derive(&path.parse()?)
    }

    pub fn extended_public_keys(&self) -> Self {
        Self(self.0.iter().map(|k| k.extended_public_key()).collect())
    }

    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.0.iter().map(|k| k.public_key()).collect()
    }

    /**
        PKH of the only key, or a MultiPKH requiring `required` of the keys
        when there are several.
    */
    pub fn raw_address(&self, required: u32) -> Result<RawAddress> {
        match self.0.as_slice() {
            [only] if required == 1 => Ok(only.raw_address()),
            keys => {
                let keys: Vec<PublicKey> = keys.iter().map(|k| k.public_key()).collect();
                Ok(RawAddress::MultiPkh(MultiPkh::from_public_keys(required, &keys)?))
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.0.len() * CUSTOM_LEN);
        varint::write_base128(&mut out, self.0.len() as u64);
        for k in &self.0 {
            out.extend_from_slice(&k.to_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8], network: Network) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let count = varint::read_base128(&mut r)?;
        if count.saturating_mul(CUSTOM_LEN as u64) != r.remaining() as u64 {
            return Err(Error::InvalidLength {
                expected: r.position() + (count as usize).saturating_mul(CUSTOM_LEN),
                got: bytes.len(),
            });
        }
        let mut keys = Vec::with_capacity(count as usize);
        for _ in 0..count {
            keys.push(ExtendedKey::from_bytes(r.read_bytes(CUSTOM_LEN)?, network)?);
        }
        Self::new(keys)
    }

    pub fn to_bip276_string(&self) -> String {
        bip276::encode(bip276::PREFIX_XKEYS, self.network(), &self.to_bytes())
    }

    pub fn to_bip276_string58(&self) -> String {
        bip276::encode58(bip276::PREFIX_XKEYS, self.network(), &self.to_bytes())
    }
}

impl fmt::Display for ExtendedKeys {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_bip276_string())
    }
}

impl FromStr for ExtendedKeys {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        for base58_form in [false, true] {
            if let Some(d) = bip276::decode_with_prefix(s, bip276::PREFIX_XKEYS, base58_form)? {
                return Self::from_bytes(&d.payload, d.network);
            }
        }
        Err(Error::BadBip276(format!("expected prefix {}", bip276::PREFIX_XKEYS)))
    }
}
