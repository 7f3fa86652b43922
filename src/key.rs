/*
    Private keys.

    A key is a secp256k1 scalar 0 < k < N tagged with the network it is
    rendered for. The network only matters for text encodings (WIF), two keys
    with the same scalar are equal whatever their network.
*/

use std::fmt;

use rand::rngs::OsRng;
use secp256k1::{PublicKey as Point, Scalar, SecretKey};

use crate::{
    curve,
    encoding::base58,
    error::{Error, Result},
    message::{self, CompactSignature},
    network::Network,
    public_key::PublicKey,
    raw_address::RawAddress,
    script::Script,
    signature::Signature,
};

/// Suffix appended to the scalar in WIF when the public key is compressed
const WIF_COMPRESSED: u8 = 0x01;

#[derive(Clone, Copy)]
pub struct Key {
    secret: SecretKey,
    network: Network,
}

impl Key {
    /**
        Draws a uniformly random valid scalar from the OS entropy source.
    */
    pub fn generate(network: Network) -> Self {
        Self {
            secret: SecretKey::new(&mut OsRng),
            network,
        }
    }

    /**
        Use a 32 byte big-endian scalar as a private key.
    */
    pub fn from_bytes(bytes: &[u8], network: Network) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::InvalidLength { expected: 32, got: bytes.len() });
        }
        let secret = SecretKey::from_slice(bytes).map_err(|_| Error::OutOfRangeKey)?;
        Ok(Self { secret, network })
    }

    pub(crate) fn from_secret(secret: SecretKey, network: Network) -> Self {
        Self { secret, network }
    }

    /**
        Imports a key from wallet import format. The network is taken
        from the prefix byte. Both the compressed (K/L/c) and the
        uncompressed (5/9) forms are accepted.
    */
    pub fn from_wif(wif: &str) -> Result<Self> {
        Ok(Self::decode_wif(wif)?.0)
    }

    /**
        Same as `from_wif` but also reports whether the WIF marked the
        public key as compressed.
    */
    pub fn decode_wif(wif: &str) -> Result<(Self, bool)> {
        let bytes = base58::check_decode(wif)?;
        let compressed = match bytes.len() {
            33 => false,
            34 if bytes[33] == WIF_COMPRESSED => true,
            34 => return Err(Error::UnknownWifSuffix(bytes[33])),
            n => return Err(Error::InvalidLength { expected: 34, got: n }),
        };
        let network = Network::from_wif_prefix(bytes[0])?;
        Ok((Self::from_bytes(&bytes[1..33], network)?, compressed))
    }

    /// Wallet import format marking the public key as compressed
    pub fn to_wif(&self) -> String {
        let mut payload = self.bytes().to_vec();
        payload.push(WIF_COMPRESSED);
        base58::check_encode(&[self.network.params().wif_prefix], &payload)
    }

    pub fn to_wif_uncompressed(&self) -> String {
        base58::check_encode(&[self.network.params().wif_prefix], &self.bytes())
    }

    /// Big-endian scalar
    pub fn bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the same scalar tagged for another network
    pub fn with_network(&self, network: Network) -> Self {
        Self { secret: self.secret, network }
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /**
        Scalar base multiplication k·G.
    */
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(Point::from_secret_key(curve::context(), &self.secret))
    }

    /**
        Deterministic (RFC 6979) low-S ECDSA signature over a 32 byte digest.
    */
    pub fn sign(&self, digest: &[u8; 32]) -> Signature {
        Signature::sign(&self.secret, digest)
    }

    /// Recoverable signature over a digest for a compressed public key
    pub fn sign_compact(&self, digest: &[u8; 32]) -> CompactSignature {
        CompactSignature::sign(&self.secret, digest, true)
    }

    /// Signs `msg` as a Bitcoin signed message
    pub fn sign_message(&self, msg: &[u8]) -> CompactSignature {
        self.sign_compact(&message::message_digest(msg))
    }

    /**
        Additive tweak (k + h) mod N. Fails with `OutOfRangeKey` when h is
        not below N or the sum is zero.
    */
    pub fn add_hash(&self, hash: &[u8; 32]) -> Result<Self> {
        let tweak = Scalar::from_be_bytes(*hash).map_err(|_| Error::OutOfRangeKey)?;
        let secret = self.secret.add_tweak(&tweak).map_err(|_| Error::OutOfRangeKey)?;
        Ok(Self { secret, network: self.network })
    }

    /**
        Shared point k·P between this key and a counterparty public key.
    */
    pub fn ecdh(&self, other: &PublicKey) -> Result<PublicKey> {
        let point = other
            .point()
            .mul_tweak(curve::context(), &Scalar::from(self.secret))
            .map_err(|_| Error::OutOfRangeKey)?;
        Ok(PublicKey::from(point))
    }

    /// PKH raw address of the compressed public key
    pub fn raw_address(&self) -> RawAddress {
        self.public_key().raw_address()
    }

    /// PKH locking script of the compressed public key
    pub fn locking_script(&self) -> Script {
        self.raw_address().locking_script()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.secret == other.secret
    }
}

impl Eq for Key {}

//Never print the scalar
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Key")
            .field("network", &self.network)
            .field("public_key", &self.public_key())
            .finish()
    }
}
