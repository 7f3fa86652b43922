/*
    Script item parser.

    A push opcode selects the length encoding of the data that follows:
        0x01..=0x4b  the opcode itself is the length
        0x4c         1 byte length
        0x4d         2 byte little-endian length
        0x4e         4 byte little-endian length
    The declared length is checked against what is left of the script
    before anything is copied.
*/

use super::{
    number,
    opcodes::{self, Opcode},
};
use crate::{
    encoding::Reader,
    error::{Error, Result},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptItem {
    Op(Opcode),
    PushData(Vec<u8>),
}

impl ScriptItem {
    /**
        The number this item pushes, if it is a push number
        (OP_0, OP_1NEGATE, OP_1..OP_16 or a minimal script number).
    */
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ScriptItem::Op(op) if *op == opcodes::OP_0 => Some(0),
            ScriptItem::Op(op) if *op == opcodes::OP_1NEGATE => Some(-1),
            ScriptItem::Op(op) => op.small_number().map(i64::from),
            ScriptItem::PushData(data) => number::decode(data).ok(),
        }
    }

    pub fn data(&self) -> Option<&[u8]> {
        match self {
            ScriptItem::PushData(data) => Some(data),
            ScriptItem::Op(_) => None,
        }
    }
}

/// Iterator over the items of a script. Stops after the first error.
#[derive(Debug, Clone)]
pub struct Items<'a> {
    reader: Reader<'a>,
    failed: bool,
}

impl<'a> Items<'a> {
    pub fn new(script: &'a [u8]) -> Self {
        Self { reader: Reader::new(script), failed: false }
    }

    fn read_item(&mut self) -> Result<ScriptItem> {
        let op = Opcode::from(self.reader.read_u8()?);
        if !op.is_push() {
            return Ok(ScriptItem::Op(op));
        }
        let len = match op {
            opcodes::OP_PUSHDATA1 => self.reader.read_u8()? as usize,
            opcodes::OP_PUSHDATA2 => self.reader.read_u16_le()? as usize,
            opcodes::OP_PUSHDATA4 => self.reader.read_u32_le()? as usize,
            _ => op.into_u8() as usize,
        };
        Ok(ScriptItem::PushData(self.reader.read_bytes(len)?.to_vec()))
    }
}

impl<'a> Iterator for Items<'a> {
    type Item = Result<ScriptItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_empty() {
            return None;
        }
        let item = self.read_item();
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

/// Parses a whole script, failing with `NotEnoughData` on a truncated push
pub fn parse(script: &[u8]) -> Result<Vec<ScriptItem>> {
    Items::new(script).collect()
}

/**
    Appends an item using the smallest push encoding for its data.
*/
pub fn write_item(out: &mut Vec<u8>, item: &ScriptItem) -> Result<()> {
    match item {
        ScriptItem::Op(op) => out.push(op.into_u8()),
        ScriptItem::PushData(data) => write_push(out, data)?,
    }
    Ok(())
}

pub fn write_push(out: &mut Vec<u8>, data: &[u8]) -> Result<()> {
    let len = data.len();
    match len {
        0..=0x4b => out.push(len as u8),
        0x4c..=0xff => {
            out.push(opcodes::OP_PUSHDATA1.into_u8());
            out.push(len as u8);
        }
        0x100..=0xffff => {
            out.push(opcodes::OP_PUSHDATA2.into_u8());
            out.extend_from_slice(&(len as u16).to_le_bytes());
        }
        _ => {
            let len = u32::try_from(len)
                .map_err(|_| Error::BadScript(format!("push of {} bytes", data.len())))?;
            out.push(opcodes::OP_PUSHDATA4.into_u8());
            out.extend_from_slice(&len.to_le_bytes());
        }
    }
    out.extend_from_slice(data);
    Ok(())
}
