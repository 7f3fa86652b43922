/*
    Base58Check: Base58( version | payload | checksum ) where the checksum
    is the first four bytes of SHA256(SHA256(version | payload)).
*/

use crate::{
    error::{Error, Result},
    hash,
};

/// Encode data in base58 without a checksum
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    Ok(bs58::decode(encoded).into_vec()?)
}

/**
    Check encode data by prepending the version bytes and appending the checksum.
*/
pub fn check_encode(version: &[u8], payload: &[u8]) -> String {
    let mut bytes: Vec<u8> = Vec::with_capacity(version.len() + payload.len() + 4);
    bytes.extend_from_slice(version);
    bytes.extend_from_slice(payload);
    let checksum = hash::checksum(&bytes);
    bytes.extend_from_slice(&checksum);
    encode(&bytes)
}

/**
    Decodes a Base58Check string and returns version | payload with the
    checksum verified and stripped.
*/
pub fn check_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut bytes = decode(encoded)?;
    if bytes.len() < 4 {
        return Err(Error::NotEnoughData);
    }
    let split = bytes.len() - 4;
    if hash::checksum(&bytes[..split]) != bytes[split..] {
        return Err(Error::BadCheckSum);
    }
    bytes.truncate(split);
    Ok(bytes)
}
