/*
    Recoverable compact signatures and Bitcoin signed messages.

    Compact form (65 bytes): header | R | S
    header = 27 + recovery id, plus 4 when the public key is compressed.
*/

use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, SecretKey,
};

use crate::{
    address::Address,
    curve,
    encoding::varint,
    error::{Error, Result},
    hash,
    public_key::PublicKey,
    raw_address::RawAddress,
    signature::Signature,
};

pub const MESSAGE_MAGIC: &str = "Bitcoin Signed Message:\n";

const HEADER_BASE: u8 = 27;
const HEADER_COMPRESSED: u8 = 4;

/**
    Digest a Bitcoin signed message is signed over:
    SHA256d( varint(len magic) | magic | varint(len msg) | msg )
*/
pub fn message_digest(msg: &[u8]) -> [u8; 32] {
    let mut data = Vec::with_capacity(MESSAGE_MAGIC.len() + msg.len() + 10);
    varint::write_compact_size(&mut data, MESSAGE_MAGIC.len() as u64);
    data.extend_from_slice(MESSAGE_MAGIC.as_bytes());
    varint::write_compact_size(&mut data, msg.len() as u64);
    data.extend_from_slice(msg);
    hash::double_sha256(data)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactSignature {
    recovery_id: u8,
    compressed: bool,
    signature: Signature,
}

impl CompactSignature {
    pub(crate) fn sign(secret: &SecretKey, digest: &[u8; 32], compressed: bool) -> Self {
        let sig = curve::context().sign_ecdsa_recoverable(&Message::from_digest(*digest), secret);
        let (id, bytes) = sig.serialize_compact();
        Self {
            recovery_id: id.to_i32() as u8,
            compressed,
            signature: Signature::from_rs(&bytes),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(Error::InvalidLength { expected: 65, got: bytes.len() });
        }
        let header = bytes[0];
        if !(HEADER_BASE..HEADER_BASE + 8).contains(&header) {
            return Err(Error::BadRecoveryId(header));
        }
        let flags = header - HEADER_BASE;
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&bytes[1..]);
        Ok(Self {
            recovery_id: flags & 0x03,
            compressed: flags & HEADER_COMPRESSED != 0,
            signature: Signature::from_compact(&rs)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = self.header();
        out[1..].copy_from_slice(&self.signature.to_compact());
        out
    }

    fn header(&self) -> u8 {
        let mut h = HEADER_BASE + self.recovery_id;
        if self.compressed {
            h += HEADER_COMPRESSED;
        }
        h
    }

    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    /**
        Recovers the public key that produced this signature over `digest`.
    */
    pub fn recover(&self, digest: &[u8; 32]) -> Result<PublicKey> {
        let id = RecoveryId::from_i32(self.recovery_id as i32)
            .map_err(|_| Error::BadRecoveryId(self.recovery_id))?;
        let sig = RecoverableSignature::from_compact(&self.signature.to_compact(), id)
            .map_err(|_| Error::BadSignature("not recoverable"))?;
        let point = curve::context()
            .recover_ecdsa(&Message::from_digest(*digest), &sig)
            .map_err(|_| Error::InvalidPoint)?;
        Ok(PublicKey::from(point))
    }

    /**
        True when the key recovered from the signature on `msg` hashes
        to the PKH address given.
    */
    pub fn verify_message(&self, msg: &[u8], address: &Address) -> bool {
        let public_key = match self.recover(&message_digest(msg)) {
            Ok(p) => p,
            Err(_) => return false,
        };
        let expected = match self.compressed {
            true => public_key.raw_address(),
            false => RawAddress::new_pkh(hash::hash160(public_key.serialize_uncompressed())),
        };
        address.raw() == &expected
    }
}

/// Checks a compact signature over a signed message against a PKH address
pub fn verify_message(msg: &[u8], sig: &CompactSignature, address: &Address) -> bool {
    sig.verify_message(msg, address)
}
