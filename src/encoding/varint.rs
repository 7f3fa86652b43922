/*
    Variable length integers.

    Base-128 varints (7 data bits per byte, least significant group first,
    high bit set on every byte except the last) prefix MultiPKH counts.
    Compact-size integers are the Bitcoin wire format used by signed messages.
*/

use super::Reader;
use crate::error::{Error, Result};

pub fn write_base128(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let b = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(b);
            return;
        }
        out.push(b | 0x80);
    }
}

pub fn read_base128(r: &mut Reader) -> Result<u64> {
    let mut value: u64 = 0;
    for shift in (0..64).step_by(7) {
        let b = r.read_u8()?;
        let bits = (b & 0x7f) as u64;
        if shift == 63 && bits > 1 {
            return Err(Error::InvalidLength { expected: 10, got: 11 });
        }
        value |= bits << shift;
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }
    //More than ten bytes can not fit in a u64
    Err(Error::InvalidLength { expected: 10, got: 11 })
}

pub fn write_compact_size(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}
