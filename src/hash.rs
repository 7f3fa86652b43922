/*
    Hash functions used to turn keys and scripts into
    identifiers, checksums and derivation material.
*/

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// Length of RIPEMD160(SHA256(x)) digests used for key, script and R hashes
pub const HASH160_LEN: usize = 20;

/**
    Takes in a byte array and returns the sha256 hash of it
*/
pub fn sha256<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(input.as_ref()));
    out
}

/**
    SHA256(SHA256(x)), used for checksums and message digests
*/
pub fn double_sha256<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    sha256(sha256(input))
}

pub fn ripemd160<T>(input: T) -> [u8; 20]
where T: AsRef<[u8]>
{
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(input.as_ref()));
    out
}

/**
    RIPEMD160(SHA256(x))
*/
pub fn hash160<T>(input: T) -> [u8; HASH160_LEN]
where T: AsRef<[u8]>
{
    ripemd160(sha256(input))
}

pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .expect("HMAC accepts keys of any length");
    mac.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/**
    HMAC-SHA512 keyed by `key`. BIP32 keys it with "Bitcoin seed" for
    master keys and with the parent chain code for children.
*/
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = Hmac::<Sha512>::new_from_slice(key)
        .expect("HMAC accepts keys of any length");
    mac.update(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// First four bytes of the double sha256, as appended by Base58Check and BIP0276
pub fn checksum<T>(input: T) -> [u8; 4]
where T: AsRef<[u8]>
{
    let h = double_sha256(input);
    [h[0], h[1], h[2], h[3]]
}
