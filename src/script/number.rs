/*
    Script numbers.

    Little-endian magnitude with the sign carried in the high bit of the
    last byte. When the magnitude already uses that bit an extra 0x00
    (positive) or 0x80 (negative) byte is appended. Zero is the empty array.
*/

use crate::error::{Error, Result};

/// Largest encoded length accepted when reading a number back
pub const MAX_NUMBER_LEN: usize = 8;

pub fn encode(value: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    if value == 0 {
        return out;
    }
    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();
    while magnitude > 0 {
        out.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }
    //out is non-empty because value != 0
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

/**
    Decodes a minimally encoded script number.
*/
pub fn decode(bytes: &[u8]) -> Result<i64> {
    if bytes.len() > MAX_NUMBER_LEN {
        return Err(Error::BadScript(format!("number of {} bytes", bytes.len())));
    }
    let (last, rest) = match bytes.split_last() {
        Some(x) => x,
        None => return Ok(0),
    };
    //The top byte may only be 0x00 / 0x80 when the byte below needs its high bit
    if last & 0x7f == 0 && rest.last().map_or(true, |b| b & 0x80 == 0) {
        return Err(Error::BadScript("non-minimal number".to_string()));
    }
    let mut magnitude: u64 = (last & 0x7f) as u64;
    for b in rest.iter().rev() {
        magnitude = (magnitude << 8) | *b as u64;
    }
    let value = magnitude as i64;
    Ok(if last & 0x80 != 0 { -value } else { value })
}
