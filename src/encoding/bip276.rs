/*
    BIP0276 style self describing text encoding.

    hex form:    <prefix>:<version><network><payload><checksum>   (all hex)
    base58 form: <prefix>:Base58(version | network | payload | checksum)

    In the hex form the checksum is taken over the text that precedes it.
    In the base58 form it is taken over prefix | ':' | version | network | payload.
*/

use super::base58;
use crate::{
    error::{Error, Result},
    hash,
    network::Network,
};

pub const CURRENT_VERSION: u8 = 0x01;

/// Prefix used for single extended keys
pub const PREFIX_XKEY: &str = "bitcoin-xkey";
/// Prefix used for lists of extended keys
pub const PREFIX_XKEYS: &str = "bitcoin-xkeys";
pub const PREFIX_SCRIPT: &str = "bitcoin-script";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bip276 {
    pub prefix: String,
    pub version: u8,
    pub network: Network,
    pub payload: Vec<u8>,
}

pub fn encode(prefix: &str, network: Network, payload: &[u8]) -> String {
    let mut s = format!(
        "{}:{:02x}{:02x}{}",
        prefix,
        CURRENT_VERSION,
        network.params().bip276_network,
        hex::encode(payload)
    );
    let checksum = hash::checksum(s.as_bytes());
    s.push_str(&hex::encode(checksum));
    s
}

pub fn encode58(prefix: &str, network: Network, payload: &[u8]) -> String {
    let mut body = vec![CURRENT_VERSION, network.params().bip276_network];
    body.extend_from_slice(payload);
    let checksum = checksum58(prefix, &body);
    body.extend_from_slice(&checksum);
    format!("{}:{}", prefix, base58::encode(&body))
}

fn checksum58(prefix: &str, body: &[u8]) -> [u8; 4] {
    let mut data = Vec::with_capacity(prefix.len() + 1 + body.len());
    data.extend_from_slice(prefix.as_bytes());
    data.push(b':');
    data.extend_from_slice(body);
    hash::checksum(data)
}

fn split_prefix(text: &str) -> Result<(&str, &str)> {
    text.split_once(':')
        .ok_or_else(|| Error::BadBip276("missing prefix".to_string()))
}

fn header(prefix: &str, version: u8, network: u8, payload: Vec<u8>) -> Result<Bip276> {
    if version != CURRENT_VERSION {
        return Err(Error::BadBip276(format!("unsupported version {}", version)));
    }
    Ok(Bip276 {
        prefix: prefix.to_string(),
        version,
        network: Network::from_bip276(network)?,
        payload,
    })
}

/**
    Decodes the hex form. The checksum is verified before anything else
    in the text is interpreted.
*/
pub fn decode(text: &str) -> Result<Bip276> {
    let (prefix, body) = split_prefix(text)?;
    if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::BadBip276("body is not hex".to_string()));
    }
    //version + network + checksum
    if body.len() < 12 || body.len() % 2 != 0 {
        return Err(Error::BadBip276("text too short".to_string()));
    }
    let check_at = text.len() - 8;
    let checksum = hex::decode(&text[check_at..])?;
    if hash::checksum(text[..check_at].as_bytes()) != checksum[..] {
        return Err(Error::BadCheckSum);
    }

    let bytes = hex::decode(&body[..body.len() - 8])?;
    header(prefix, bytes[0], bytes[1], bytes[2..].to_vec())
}

pub fn decode58(text: &str) -> Result<Bip276> {
    let (prefix, body) = split_prefix(text)?;
    let bytes = base58::decode(body)?;
    if bytes.len() < 6 {
        return Err(Error::NotEnoughData);
    }
    let split = bytes.len() - 4;
    if checksum58(prefix, &bytes[..split]) != bytes[split..] {
        return Err(Error::BadCheckSum);
    }
    header(prefix, bytes[0], bytes[1], bytes[2..split].to_vec())
}

/**
    Checks a `<prefix>:<body>` text against the checksum of either form.
    `None` when the text is in neither form.
*/
fn checksum_valid(text: &str) -> Option<bool> {
    let (prefix, body) = text.split_once(':')?;
    let mut well_formed = false;
    if body.len() >= 12 && body.len() % 2 == 0 && body.bytes().all(|b| b.is_ascii_hexdigit()) {
        well_formed = true;
        let check_at = text.len() - 8;
        if let Ok(checksum) = hex::decode(&text[check_at..]) {
            if hash::checksum(text[..check_at].as_bytes()) == checksum[..] {
                return Some(true);
            }
        }
    }
    if let Ok(bytes) = base58::decode(body) {
        if bytes.len() >= 6 {
            well_formed = true;
            let split = bytes.len() - 4;
            if checksum58(prefix, &bytes[..split]) == bytes[split..] {
                return Some(true);
            }
        }
    }
    well_formed.then_some(false)
}

/**
    Decodes either form, expecting `prefix`. Returns `Ok(None)` when the
    text carries a different prefix so callers can try other formats. A
    different prefix with a bad checksum is a corrupted text and fails with
    `BadCheckSum`.
*/
pub fn decode_with_prefix(text: &str, prefix: &str, base58_form: bool) -> Result<Option<Bip276>> {
    let body = match text.split_once(':') {
        Some((p, body)) if p == prefix => body,
        _ if checksum_valid(text) == Some(false) => return Err(Error::BadCheckSum),
        _ => return Ok(None),
    };
    if base58_form {
        return decode58(text).map(Some);
    }
    //Both forms share the prefix, a body that is not hex belongs to the base58 form
    if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Ok(None);
    }
    decode(text).map(Some)
}
