/*
    Opcodes understood by the script engine.

    Only the opcodes the standard templates are made of, plus the usual
    stack and arithmetic opcodes that show up in asm fixtures, have names.
    Every other byte is rendered as OP_UNKNOWN<n>.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode {
    code: u8,
}

impl Opcode {
    pub const fn into_u8(self) -> u8 {
        self.code
    }

    /// Opcodes 0x01..=0x4e carry push data
    pub fn is_push(self) -> bool {
        (0x01..=OP_PUSHDATA4.code).contains(&self.code)
    }

    /// OP_1 through OP_16
    pub fn small_number(self) -> Option<u8> {
        match self.code {
            0x51..=0x60 => Some(self.code - 0x50),
            _ => None,
        }
    }

    pub fn name(self) -> Option<&'static str> {
        NAMES.iter().find(|(op, _)| *op == self).map(|(_, n)| *n)
    }

    /// Looks up an opcode by its asm name, including aliases such as OP_FALSE
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some((_, op)) = ALIASES.iter().find(|(n, _)| *n == name) {
            return Some(*op);
        }
        if let Some((op, _)) = NAMES.iter().find(|(_, n)| *n == name) {
            return Some(*op);
        }
        name.strip_prefix("OP_UNKNOWN")
            .and_then(|n| n.parse::<u8>().ok())
            .map(Opcode::from)
    }
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Self {
        Self { code }
    }
}

// Opcode constants
pub const OP_0: Opcode = Opcode { code: 0x00 };
pub const OP_FALSE: Opcode = OP_0;
pub const OP_PUSHDATA1: Opcode = Opcode { code: 0x4c };
pub const OP_PUSHDATA2: Opcode = Opcode { code: 0x4d };
pub const OP_PUSHDATA4: Opcode = Opcode { code: 0x4e };
pub const OP_1NEGATE: Opcode = Opcode { code: 0x4f };
pub const OP_1: Opcode = Opcode { code: 0x51 };
pub const OP_TRUE: Opcode = OP_1;
pub const OP_2: Opcode = Opcode { code: 0x52 };
pub const OP_3: Opcode = Opcode { code: 0x53 };
pub const OP_16: Opcode = Opcode { code: 0x60 };

//Flow control
pub const OP_NOP: Opcode = Opcode { code: 0x61 };
pub const OP_IF: Opcode = Opcode { code: 0x63 };
pub const OP_NOTIF: Opcode = Opcode { code: 0x64 };
pub const OP_ELSE: Opcode = Opcode { code: 0x67 };
pub const OP_ENDIF: Opcode = Opcode { code: 0x68 };
pub const OP_VERIFY: Opcode = Opcode { code: 0x69 };
/// Marks the output as unspendable
pub const OP_RETURN: Opcode = Opcode { code: 0x6a };

//Stack
pub const OP_TOALTSTACK: Opcode = Opcode { code: 0x6b };
pub const OP_FROMALTSTACK: Opcode = Opcode { code: 0x6c };
pub const OP_2DROP: Opcode = Opcode { code: 0x6d };
pub const OP_2DUP: Opcode = Opcode { code: 0x6e };
pub const OP_DEPTH: Opcode = Opcode { code: 0x74 };
pub const OP_DROP: Opcode = Opcode { code: 0x75 };
pub const OP_DUP: Opcode = Opcode { code: 0x76 };
pub const OP_NIP: Opcode = Opcode { code: 0x77 };
pub const OP_OVER: Opcode = Opcode { code: 0x78 };
pub const OP_PICK: Opcode = Opcode { code: 0x79 };
pub const OP_ROLL: Opcode = Opcode { code: 0x7a };
pub const OP_ROT: Opcode = Opcode { code: 0x7b };
pub const OP_SWAP: Opcode = Opcode { code: 0x7c };
pub const OP_TUCK: Opcode = Opcode { code: 0x7d };

//Splice
pub const OP_CAT: Opcode = Opcode { code: 0x7e };
/// Splits the top item at the position given; used by R-puzzles to cut R out of a signature
pub const OP_SPLIT: Opcode = Opcode { code: 0x7f };
pub const OP_SIZE: Opcode = Opcode { code: 0x82 };

//Bitwise logic and arithmetic
pub const OP_EQUAL: Opcode = Opcode { code: 0x87 };
pub const OP_EQUALVERIFY: Opcode = Opcode { code: 0x88 };
pub const OP_1ADD: Opcode = Opcode { code: 0x8b };
pub const OP_1SUB: Opcode = Opcode { code: 0x8c };
pub const OP_NOT: Opcode = Opcode { code: 0x91 };
pub const OP_ADD: Opcode = Opcode { code: 0x93 };
pub const OP_SUB: Opcode = Opcode { code: 0x94 };
pub const OP_NUMEQUAL: Opcode = Opcode { code: 0x9c };
pub const OP_LESSTHAN: Opcode = Opcode { code: 0x9f };
pub const OP_GREATERTHAN: Opcode = Opcode { code: 0xa0 };
pub const OP_LESSTHANOREQUAL: Opcode = Opcode { code: 0xa1 };
pub const OP_GREATERTHANOREQUAL: Opcode = Opcode { code: 0xa2 };

//Crypto
pub const OP_RIPEMD160: Opcode = Opcode { code: 0xa6 };
pub const OP_SHA256: Opcode = Opcode { code: 0xa8 };
pub const OP_HASH160: Opcode = Opcode { code: 0xa9 };
pub const OP_HASH256: Opcode = Opcode { code: 0xaa };
pub const OP_CHECKSIG: Opcode = Opcode { code: 0xac };
pub const OP_CHECKSIGVERIFY: Opcode = Opcode { code: 0xad };
pub const OP_CHECKMULTISIG: Opcode = Opcode { code: 0xae };
pub const OP_CHECKMULTISIGVERIFY: Opcode = Opcode { code: 0xaf };

//Template placeholders, never valid in a finished script
/// Stands in for the hash160 of a public key
pub const OP_PUBKEYHASH: Opcode = Opcode { code: 0xfd };
/// Stands in for a compressed public key
pub const OP_PUBKEY: Opcode = Opcode { code: 0xfe };
pub const OP_INVALIDOPCODE: Opcode = Opcode { code: 0xff };

const ALIASES: &[(&str, Opcode)] = &[("OP_FALSE", OP_0), ("OP_TRUE", OP_1)];

const NAMES: &[(Opcode, &str)] = &[
    (OP_0, "OP_0"),
    (OP_PUSHDATA1, "OP_PUSHDATA1"),
    (OP_PUSHDATA2, "OP_PUSHDATA2"),
    (OP_PUSHDATA4, "OP_PUSHDATA4"),
    (OP_1NEGATE, "OP_1NEGATE"),
    (OP_1, "OP_1"),
    (OP_2, "OP_2"),
    (OP_3, "OP_3"),
    (Opcode { code: 0x54 }, "OP_4"),
    (Opcode { code: 0x55 }, "OP_5"),
    (Opcode { code: 0x56 }, "OP_6"),
    (Opcode { code: 0x57 }, "OP_7"),
    (Opcode { code: 0x58 }, "OP_8"),
    (Opcode { code: 0x59 }, "OP_9"),
    (Opcode { code: 0x5a }, "OP_10"),
    (Opcode { code: 0x5b }, "OP_11"),
    (Opcode { code: 0x5c }, "OP_12"),
    (Opcode { code: 0x5d }, "OP_13"),
    (Opcode { code: 0x5e }, "OP_14"),
    (Opcode { code: 0x5f }, "OP_15"),
    (OP_16, "OP_16"),
    (OP_NOP, "OP_NOP"),
    (OP_IF, "OP_IF"),
    (OP_NOTIF, "OP_NOTIF"),
    (OP_ELSE, "OP_ELSE"),
    (OP_ENDIF, "OP_ENDIF"),
    (OP_VERIFY, "OP_VERIFY"),
    (OP_RETURN, "OP_RETURN"),
    (OP_TOALTSTACK, "OP_TOALTSTACK"),
    (OP_FROMALTSTACK, "OP_FROMALTSTACK"),
    (OP_2DROP, "OP_2DROP"),
    (OP_2DUP, "OP_2DUP"),
    (OP_DEPTH, "OP_DEPTH"),
    (OP_DROP, "OP_DROP"),
    (OP_DUP, "OP_DUP"),
    (OP_NIP, "OP_NIP"),
    (OP_OVER, "OP_OVER"),
    (OP_PICK, "OP_PICK"),
    (OP_ROLL, "OP_ROLL"),
    (OP_ROT, "OP_ROT"),
    (OP_SWAP, "OP_SWAP"),
    (OP_TUCK, "OP_TUCK"),
    (OP_CAT, "OP_CAT"),
    (OP_SPLIT, "OP_SPLIT"),
    (OP_SIZE, "OP_SIZE"),
    (OP_EQUAL, "OP_EQUAL"),
    (OP_EQUALVERIFY, "OP_EQUALVERIFY"),
    (OP_1ADD, "OP_1ADD"),
    (OP_1SUB, "OP_1SUB"),
    (OP_NOT, "OP_NOT"),
    (OP_ADD, "OP_ADD"),
    (OP_SUB, "OP_SUB"),
    (OP_NUMEQUAL, "OP_NUMEQUAL"),
    (OP_LESSTHAN, "OP_LESSTHAN"),
    (OP_GREATERTHAN, "OP_GREATERTHAN"),
    (OP_LESSTHANOREQUAL, "OP_LESSTHANOREQUAL"),
    (OP_GREATERTHANOREQUAL, "OP_GREATERTHANOREQUAL"),
    (OP_RIPEMD160, "OP_RIPEMD160"),
    (OP_SHA256, "OP_SHA256"),
    (OP_HASH160, "OP_HASH160"),
    (OP_HASH256, "OP_HASH256"),
    (OP_CHECKSIG, "OP_CHECKSIG"),
    (OP_CHECKSIGVERIFY, "OP_CHECKSIGVERIFY"),
    (OP_CHECKMULTISIG, "OP_CHECKMULTISIG"),
    (OP_CHECKMULTISIGVERIFY, "OP_CHECKMULTISIGVERIFY"),
    (OP_PUBKEYHASH, "OP_PUBKEYHASH"),
    (OP_PUBKEY, "OP_PUBKEY"),
    (OP_INVALIDOPCODE, "OP_INVALIDOPCODE"),
];
