/*
    This module implements extended keys that are
    used in BIP32 hierarchical deterministic wallets.

    An extended key is a private or public key together with a 32 byte
    chain code and its position in the tree (depth, parent fingerprint,
    child index). Only the chain code and the key take part in equality.

    Byte forms:
        custom (75): 0x40 | depth | fingerprint(4) | index(4, BE) | chain code(32) | key(33)
        legacy (78): version(4) | depth | fingerprint(4) | index(4, BE) | chain code(32) | key(33)
    where key is 0x00 | scalar for private keys and the compressed point
    for public keys. The custom form carries no network, the text forms
    around it do.
*/

use std::fmt;
use std::str::FromStr;

use rand::{rngs::OsRng, RngCore};
use tracing::debug;

use super::{
    ckd::{ckd_priv, ckd_pub},
    path::{ChildIndex, Path},
};
use crate::{
    encoding::{base58, bip276, Reader},
    error::{Error, Result},
    hash,
    key::Key,
    network::Network,
    public_key::PublicKey,
    raw_address::RawAddress,
};

/// HMAC key used to split a seed into the master key and chain code
pub const MASTER_SEED_KEY: &[u8] = b"Bitcoin seed";
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;
/// Seed length used by `generate_master`
pub const RECOMMENDED_SEED_LEN: usize = 64;

/// Leading byte of the custom byte form
pub const CUSTOM_MARKER: u8 = 0x40;
pub const CUSTOM_LEN: usize = 75;
pub const LEGACY_LEN: usize = 78;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMaterial {
    Private(Key),
    Public(PublicKey),
}

impl KeyMaterial {
    fn to_bytes(&self) -> [u8; 33] {
        match self {
            KeyMaterial::Private(k) => {
                let mut out = [0u8; 33];
                out[1..].copy_from_slice(&k.bytes());
                out
            }
            KeyMaterial::Public(pk) => pk.serialize(),
        }
    }

    fn from_bytes(bytes: &[u8; 33], network: Network) -> Result<Self> {
        match bytes[0] {
            0x00 => Ok(KeyMaterial::Private(Key::from_bytes(&bytes[1..], network)?)),
            _ => Ok(KeyMaterial::Public(PublicKey::from_bytes(bytes)?)),
        }
    }

    fn public_key(&self) -> PublicKey {
        match self {
            KeyMaterial::Private(k) => k.public_key(),
            KeyMaterial::Public(pk) => *pk,
        }
    }
}

#[derive(Clone, Copy)]
pub struct ExtendedKey {
    network: Network,
    depth: u8,
    parent_fingerprint: [u8; 4],
    index: u32,
    chain_code: [u8; 32],
    material: KeyMaterial,
}

/// Tries one byte format, `Ok(None)` meaning "not this format"
type ByteDecoder = fn(&[u8], Network) -> Result<Option<ExtendedKey>>;
/// Tries one text format, `Ok(None)` meaning "not this format"
type TextDecoder = fn(&str) -> Result<Option<ExtendedKey>>;

const BYTE_DECODERS: [(&str, ByteDecoder); 2] = [
    ("custom", ExtendedKey::decode_custom),
    ("legacy", ExtendedKey::decode_legacy),
];

const TEXT_DECODERS: [(&str, TextDecoder); 3] = [
    ("bip276 hex", ExtendedKey::decode_bip276_hex),
    ("bip276 base58", ExtendedKey::decode_bip276_58),
    ("legacy base58", ExtendedKey::decode_legacy_string),
];

impl ExtendedKey {
    /**
        Derives the master key from a seed.
        I = HMAC-SHA512("Bitcoin seed", seed), IL is the key and IR the chain code.
    */
    pub fn load_master(seed: &[u8], network: Network) -> Result<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(Error::InvalidLength { expected: RECOMMENDED_SEED_LEN, got: seed.len() });
        }
        let i = hash::hmac_sha512(MASTER_SEED_KEY, seed);
        let key = Key::from_bytes(&i[..32], network)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        Ok(Self {
            network,
            depth: 0,
            parent_fingerprint: [0; 4],
            index: 0,
            chain_code,
            material: KeyMaterial::Private(key),
        })
    }

    /// Master key from a fresh random seed
    pub fn generate_master(network: Network) -> Result<Self> {
        let mut seed = [0u8; RECOMMENDED_SEED_LEN];
        OsRng.fill_bytes(&mut seed);
        Self::load_master(&seed, network)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn with_network(&self, network: Network) -> Self {
        let material = match self.material {
            KeyMaterial::Private(k) => KeyMaterial::Private(k.with_network(network)),
            public => public,
        };
        Self { network, material, ..*self }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn child_index(&self) -> ChildIndex {
        ChildIndex::from_index(self.index)
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    pub fn is_private(&self) -> bool {
        matches!(self.material, KeyMaterial::Private(_))
    }

    /// The private key, `NotPrivate` for extended public keys
    pub fn key(&self) -> Result<Key> {
        match self.material {
            KeyMaterial::Private(k) => Ok(k),
            KeyMaterial::Public(_) => Err(Error::NotPrivate),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.material.public_key()
    }

    /// Hash160 of the compressed public key
    pub fn identifier(&self) -> [u8; 20] {
        self.public_key().hash160()
    }

    /// First four bytes of the identifier, stored in children as their parent fingerprint
    pub fn fingerprint(&self) -> [u8; 4] {
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.identifier()[..4]);
        out
    }

    /// PKH raw address of the public key
    pub fn raw_address(&self) -> RawAddress {
        self.public_key().raw_address()
    }

    /**
        Derives the child at `index`. Indexes of 2^31 and above are
        hardened and need a private key.
    */
    pub fn child_key(&self, index: u32) -> Result<Self> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or(Error::InvalidLength { expected: u8::MAX as usize, got: u8::MAX as usize + 1 })?;

        let (material, chain_code) = match &self.material {
            KeyMaterial::Private(k) => {
                let (child, cc) = ckd_priv(k, &self.chain_code, index)?;
                (KeyMaterial::Private(child), cc)
            }
            KeyMaterial::Public(pk) => {
                let (child, cc) = ckd_pub(pk, &self.chain_code, index)?;
                (KeyMaterial::Public(child), cc)
            }
        };
        debug!(depth, index, private = self.is_private(), "derived child key");

        Ok(Self {
            network: self.network,
            depth,
            parent_fingerprint: self.fingerprint(),
            index,
            chain_code,
            material,
        })
    }

    /// Derive the key at the given path, relative to self
    pub fn derive(&self, path: &Path) -> Result<Self> {
        path.indexes()?
            .into_iter()
            .try_fold(*self, |key, index| key.child_key(index))
    }

    /**
        Derive the key at a path given as a string.
        eg. "m/44'/0'/0'/0"
    */
    pub fn child_key_for_path(&self, path: &str) -> Result<Self> {
        self.derive(&path.parse()?)
    }

    /// Same position in the tree with the private material stripped
    pub fn extended_public_key(&self) -> Self {
        Self { material: KeyMaterial::Public(self.public_key()), ..*self }
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.push(self.depth);
        out.extend_from_slice(&self.parent_fingerprint);
        out.extend_from_slice(&self.index.to_be_bytes());
        out.extend_from_slice(&self.chain_code);
        out.extend_from_slice(&self.material.to_bytes());
    }

    fn read_body(r: &mut Reader, network: Network) -> Result<Self> {
        let depth = r.read_u8()?;
        let parent_fingerprint = r.read_array::<4>()?;
        let index = r.read_u32_be()?;
        let chain_code = r.read_array::<32>()?;
        let material = KeyMaterial::from_bytes(&r.read_array::<33>()?, network)?;
        r.finish()?;
        Ok(Self { network, depth, parent_fingerprint, index, chain_code, material })
    }

    /// The 75 byte custom form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CUSTOM_LEN);
        out.push(CUSTOM_MARKER);
        self.write_body(&mut out);
        out
    }

    /// The 78 byte BIP32 serialization
    pub fn to_legacy_bytes(&self) -> Vec<u8> {
        let params = self.network.params();
        let version = if self.is_private() { params.xprv_version } else { params.xpub_version };
        let mut out = Vec::with_capacity(LEGACY_LEN);
        out.extend_from_slice(&version);
        self.write_body(&mut out);
        out
    }

    /// xprv / xpub / tprv / tpub string
    pub fn to_legacy_string(&self) -> String {
        base58::check_encode(&[], &self.to_legacy_bytes())
    }

    pub fn to_bip276_string(&self) -> String {
        bip276::encode(bip276::PREFIX_XKEY, self.network, &self.to_bytes())
    }

    pub fn to_bip276_string58(&self) -> String {
        bip276::encode58(bip276::PREFIX_XKEY, self.network, &self.to_bytes())
    }

    fn decode_custom(bytes: &[u8], network: Network) -> Result<Option<Self>> {
        if bytes.first() != Some(&CUSTOM_MARKER) {
            return Ok(None);
        }
        if bytes.len() != CUSTOM_LEN {
            return Err(Error::InvalidLength { expected: CUSTOM_LEN, got: bytes.len() });
        }
        let mut r = Reader::new(&bytes[1..]);
        Self::read_body(&mut r, network).map(Some)
    }

    /// The network comes from the version bytes, not the caller
    fn decode_legacy(bytes: &[u8], _network: Network) -> Result<Option<Self>> {
        if bytes.len() != LEGACY_LEN {
            return Ok(None);
        }
        let mut r = Reader::new(bytes);
        let version = r.read_array::<4>()?;
        let (network, private) = Network::from_xkey_version(version)?;
        let key = Self::read_body(&mut r, network)?;
        if key.is_private() != private {
            return Err(Error::UnknownVersion(version));
        }
        Ok(Some(key))
    }

    /**
        Decodes the custom form, falling back to the legacy 78 byte form.
        `network` is used by the custom form only.
    */
    pub fn from_bytes(bytes: &[u8], network: Network) -> Result<Self> {
        for (name, decoder) in BYTE_DECODERS {
            match decoder(bytes, network)? {
                Some(key) => return Ok(key),
                None => debug!(format = name, "not this extended key format, trying next"),
            }
        }
        Err(Error::InvalidLength { expected: CUSTOM_LEN, got: bytes.len() })
    }

    fn decode_bip276_hex(s: &str) -> Result<Option<Self>> {
        match bip276::decode_with_prefix(s, bip276::PREFIX_XKEY, false)? {
            Some(d) => Self::from_bytes(&d.payload, d.network).map(Some),
            None => Ok(None),
        }
    }

    fn decode_bip276_58(s: &str) -> Result<Option<Self>> {
        match bip276::decode_with_prefix(s, bip276::PREFIX_XKEY, true)? {
            Some(d) => Self::from_bytes(&d.payload, d.network).map(Some),
            None => Ok(None),
        }
    }

    fn decode_legacy_string(s: &str) -> Result<Option<Self>> {
        let bytes = base58::check_decode(s)?;
        match Self::decode_legacy(&bytes, Network::default())? {
            Some(key) => Ok(Some(key)),
            None => Err(Error::InvalidLength { expected: LEGACY_LEN, got: bytes.len() }),
        }
    }
}

impl PartialEq for ExtendedKey {
    fn eq(&self, other: &Self) -> bool {
        self.chain_code == other.chain_code && self.material == other.material
    }
}

impl Eq for ExtendedKey {}

//Chain code and private key stay out of debug output
impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("network", &self.network)
            .field("private", &self.is_private())
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("index", &self.child_index())
            .field("public_key", &self.public_key())
            .finish()
    }
}

impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_bip276_string())
    }
}

impl FromStr for ExtendedKey {
    type Err = Error;

    /**
        Accepts the BIP0276 hex and base58 forms and legacy xprv/xpub strings,
        tried in that order.
    */
    fn from_str(s: &str) -> Result<Self> {
        for (name, decoder) in TEXT_DECODERS {
            match decoder(s)? {
                Some(key) => return Ok(key),
                None => debug!(format = name, "not this extended key format, trying next"),
            }
        }
        Err(Error::BadBip276(format!("unrecognised extended key {}", s)))
    }
}
