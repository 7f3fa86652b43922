/*
    This module implements child key derivation
    from parent extended private and public keys
    under the BIP32 standard.

    I = HMAC-SHA512(key = parent chain code, data)
        data = 0x00 | parent private key | index     (hardened)
        data = parent compressed public key | index   (normal)
    The left half of I tweaks the parent key, the right half is the
    child chain code.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki
*/

use tracing::trace;

use super::path::HARDENED_OFFSET;
use crate::{
    error::{Error, Result},
    hash::hmac_sha512,
    key::Key,
    public_key::PublicKey,
};

fn split(i: [u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut il = [0u8; 32];
    let mut ir = [0u8; 32];
    il.copy_from_slice(&i[..32]);
    ir.copy_from_slice(&i[32..]);
    (il, ir)
}

/**
    Derives a child private key and chain code from a parent private key.
    An IL not below N or a zero child key is an `OutOfRangeKey` error.
*/
pub fn ckd_priv(parent: &Key, chain_code: &[u8; 32], index: u32) -> Result<(Key, [u8; 32])> {
    let mut data: Vec<u8> = Vec::with_capacity(37);
    if index >= HARDENED_OFFSET {
        data.push(0x00);
        data.extend_from_slice(&parent.bytes());
    } else {
        data.extend_from_slice(&parent.public_key().serialize());
    }
    data.extend_from_slice(&index.to_be_bytes());

    let (il, child_chain_code) = split(hmac_sha512(chain_code, &data));
    trace!(index, hardened = index >= HARDENED_OFFSET, "deriving private child");
    Ok((parent.add_hash(&il)?, child_chain_code))
}

/**
    Derives a child public key and chain code from a parent public key.
    Only normal indexes can be derived this way.
*/
pub fn ckd_pub(parent: &PublicKey, chain_code: &[u8; 32], index: u32) -> Result<(PublicKey, [u8; 32])> {
    if index >= HARDENED_OFFSET {
        return Err(Error::CannotDeriveHardenedFromPublic);
    }
    let mut data: Vec<u8> = Vec::with_capacity(37);
    data.extend_from_slice(&parent.serialize());
    data.extend_from_slice(&index.to_be_bytes());

    let (il, child_chain_code) = split(hmac_sha512(chain_code, &data));
    trace!(index, "deriving public child");
    Ok((parent.add_hash(&il)?, child_chain_code))
}
