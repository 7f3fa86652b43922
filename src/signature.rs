/*
    ECDSA signatures.

    Nonces are derived per RFC 6979 and S is always normalized to the low
    half of the group (S <= N/2) when signing. DER parsing is strict: any
    structural deviation is an error, there is no lenient fallback.

    DER: 0x30 len 0x02 len(R) R 0x02 len(S) S
*/

use secp256k1::{ecdsa, Message, SecretKey};

use crate::{
    curve,
    encoding::Reader,
    error::{Error, Result},
    public_key::PublicKey,
};

const DER_SEQUENCE: u8 = 0x30;
const DER_INTEGER: u8 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /**
        Builds a signature from big-endian R and S. Both must be in [1, N-1].
    */
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Result<Self> {
        if !curve::is_valid_scalar(&r) {
            return Err(Error::BadSignature("r out of range"));
        }
        if !curve::is_valid_scalar(&s) {
            return Err(Error::BadSignature("s out of range"));
        }
        Ok(Self { r, s })
    }

    pub(crate) fn sign(secret: &SecretKey, digest: &[u8; 32]) -> Self {
        let sig = curve::context().sign_ecdsa(&Message::from_digest(*digest), secret);
        //libsecp256k1 already returns the low-S form and never r = 0 or s = 0
        Self::from_rs(&sig.serialize_compact())
    }

    /// r | s produced by libsecp256k1, already in range
    pub(crate) fn from_rs(compact: &[u8; 64]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Self { r, s }
    }

    /**
        Parses a strict DER signature.
    */
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(der);
        if reader.read_u8()? != DER_SEQUENCE {
            return Err(Error::BadSignature("missing sequence marker"));
        }
        let len = reader.read_u8()? as usize;
        if len != reader.remaining() {
            return Err(Error::BadSignature("sequence length mismatch"));
        }
        let r = read_der_integer(&mut reader)?;
        let s = read_der_integer(&mut reader)?;
        if !reader.is_empty() {
            return Err(Error::BadSignature("trailing bytes"));
        }
        Self::new(r, s)
    }

    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);
        let mut out = Vec::with_capacity(6 + r.len() + s.len());
        out.push(DER_SEQUENCE);
        out.push((4 + r.len() + s.len()) as u8);
        out.push(DER_INTEGER);
        out.push(r.len() as u8);
        out.extend_from_slice(&r);
        out.push(DER_INTEGER);
        out.push(s.len() as u8);
        out.extend_from_slice(&s);
        out
    }

    /// 64 bytes r | s
    pub fn from_compact(bytes: &[u8; 64]) -> Result<Self> {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self::new(r, s)
    }

    pub fn to_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    pub fn r(&self) -> [u8; 32] {
        self.r
    }

    pub fn s(&self) -> [u8; 32] {
        self.s
    }

    /**
        R exactly as it is written inside the DER encoding (minimal, with a
        leading zero when the high bit is set). This is what R-puzzles hash.
    */
    pub fn r_der(&self) -> Vec<u8> {
        der_integer(&self.r)
    }

    pub fn is_low_s(&self) -> bool {
        curve::is_low_s(&self.s)
    }

    /// Replaces a high S with N - S
    pub fn to_low_s(&self) -> Self {
        if self.is_low_s() {
            return *self;
        }
        Self { r: self.r, s: curve::negate_scalar(&self.s) }
    }

    /**
        Checks the signature against a digest and public key. High-S
        signatures are normalized before checking.
    */
    pub fn verify(&self, digest: &[u8; 32], public_key: &PublicKey) -> bool {
        let mut sig = match ecdsa::Signature::from_compact(&self.to_compact()) {
            Ok(s) => s,
            Err(_) => return false,
        };
        sig.normalize_s();
        curve::context()
            .verify_ecdsa(&Message::from_digest(*digest), &sig, &public_key.point())
            .is_ok()
    }
}

fn read_der_integer(reader: &mut Reader) -> Result<[u8; 32]> {
    if reader.read_u8()? != DER_INTEGER {
        return Err(Error::BadSignature("missing integer marker"));
    }
    let len = reader.read_u8()? as usize;
    let bytes = reader.read_bytes(len)?;
    match bytes {
        [] => return Err(Error::BadSignature("empty integer")),
        [first, ..] if first & 0x80 != 0 => return Err(Error::BadSignature("negative integer")),
        [0x00, second, ..] if second & 0x80 == 0 => {
            return Err(Error::BadSignature("excess padding"))
        }
        _ => {}
    }
    let trimmed = match bytes {
        [0x00, rest @ ..] if !rest.is_empty() => rest,
        _ => bytes,
    };
    curve::to_scalar_bytes(trimmed).ok_or(Error::BadSignature("integer too long"))
}

/// Minimal big-endian integer with a zero pad when the high bit is set
fn der_integer(value: &[u8; 32]) -> Vec<u8> {
    let start = value.iter().position(|b| *b != 0).unwrap_or(31);
    let mut out = Vec::with_capacity(33);
    if value[start] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(&value[start..]);
    out
}
