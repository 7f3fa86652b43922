/*

    Script builder module.

*/

use super::{
    number,
    opcodes::{self, Opcode},
    parser::{self, ScriptItem},
    Script,
};

#[derive(Debug, Clone, Default)]
pub struct Builder {
    code: Vec<u8>,
}

impl Builder {
    /// Return a new instance of self
    pub fn new() -> Self {
        Self { code: Vec::new() }
    }

    /// Push an opcode into self
    pub fn push_opcode(mut self, opcode: Opcode) -> Self {
        self.code.push(opcode.into_u8());
        self
    }

    /// Push data with the smallest push opcode that fits it
    pub fn push_data(mut self, data: &[u8]) -> Self {
        //Data over 4GB can not be pushed, leave an invalid opcode in its place
        if parser::write_push(&mut self.code, data).is_err() {
            self.code.push(opcodes::OP_INVALIDOPCODE.into_u8());
        }
        self
    }

    /**
        Push a number: OP_0, OP_1NEGATE and OP_1..OP_16 have their own
        opcodes, anything else is pushed as a script number.
    */
    pub fn push_number(self, n: i64) -> Self {
        match n {
            0 => self.push_opcode(opcodes::OP_0),
            -1 => self.push_opcode(opcodes::OP_1NEGATE),
            1..=16 => self.push_opcode(Opcode::from(0x50 + n as u8)),
            _ => self.push_data(&number::encode(n)),
        }
    }

    pub fn push_item(self, item: &ScriptItem) -> Self {
        match item {
            ScriptItem::Op(op) => self.push_opcode(*op),
            ScriptItem::PushData(data) => self.push_data(data),
        }
    }

    /// Convert self into a script
    pub fn into_script(self) -> Script {
        Script::new(self.code)
    }
}
