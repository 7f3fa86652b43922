/*
    Locking scripts.

    A script owns its bytes and is only ever parsed into items or rendered
    back from them. Classification into addresses lives in raw_address.
*/

pub mod builder;
pub mod number;
pub mod opcodes;
pub mod parser;
pub mod template;

pub use builder::Builder;
pub use opcodes::Opcode;
pub use parser::{Items, ScriptItem};
pub use template::Template;

use crate::{
    error::{Error, Result},
    hash,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /**
        Hash the script with Hash160
    */
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(&self.0)
    }

    pub fn items(&self) -> Items {
        Items::new(&self.0)
    }

    pub fn parse(&self) -> Result<Vec<ScriptItem>> {
        parser::parse(&self.0)
    }

    pub fn from_items(items: &[ScriptItem]) -> Self {
        items
            .iter()
            .fold(Builder::new(), |b, item| b.push_item(item))
            .into_script()
    }

    /**
        Starts with OP_RETURN or OP_FALSE OP_RETURN. Nothing after such a
        prefix can ever make the output spendable.
    */
    pub fn is_provably_unspendable(&self) -> bool {
        let mut items = self.items();
        match items.next() {
            Some(Ok(ScriptItem::Op(opcodes::OP_RETURN))) => true,
            Some(Ok(ScriptItem::Op(opcodes::OP_0))) => {
                matches!(items.next(), Some(Ok(ScriptItem::Op(opcodes::OP_RETURN))))
            }
            _ => false,
        }
    }

    /**
        Parses space separated asm: opcode names, `0` and `-1` for OP_0 and
        OP_1NEGATE, and hex for push data.
    */
    pub fn from_asm(asm: &str) -> Result<Self> {
        let mut b = Builder::new();
        for token in asm.split_whitespace() {
            b = match token {
                "0" => b.push_opcode(opcodes::OP_0),
                "-1" => b.push_opcode(opcodes::OP_1NEGATE),
                t if t.starts_with("OP_") => match Opcode::from_name(t) {
                    Some(op) => b.push_opcode(op),
                    None => return Err(Error::BadScript(format!("unknown opcode {}", t))),
                },
                t => b.push_data(&hex::decode(t)?),
            };
        }
        Ok(b.into_script())
    }

    pub fn to_asm(&self) -> Result<String> {
        let mut tokens: Vec<String> = vec![];
        for item in self.items() {
            tokens.push(match item? {
                ScriptItem::Op(opcodes::OP_0) => "0".to_string(),
                ScriptItem::Op(opcodes::OP_1NEGATE) => "-1".to_string(),
                ScriptItem::Op(op) => match op.name() {
                    Some(name) => name.to_string(),
                    None => format!("OP_UNKNOWN{}", op.into_u8()),
                },
                ScriptItem::PushData(data) if data.is_empty() => "0".to_string(),
                ScriptItem::PushData(data) => hex::encode(data),
            });
        }
        Ok(tokens.join(" "))
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
