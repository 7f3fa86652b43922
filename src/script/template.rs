/*
    Script templates.

    A template is a script where OP_PUBKEY / OP_PUBKEYHASH stand in for a
    public key / its hash160. Instantiating walks the template and replaces
    the n-th placeholder with the n-th key supplied.

    The standard skeletons are also built here, taking the item to put in
    each key slot, so templates and finished locking scripts come from the
    same code.
*/

use tracing::debug;

use super::{
    opcodes::*,
    Builder, Script, ScriptItem,
};
use crate::{
    error::{Error, Result},
    public_key::PublicKey,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template(Script);

impl Template {
    pub fn new(script: Script) -> Self {
        Self(script)
    }

    pub fn from_asm(asm: &str) -> Result<Self> {
        Ok(Self(Script::from_asm(asm)?))
    }

    /// OP_DUP OP_HASH160 OP_PUBKEYHASH OP_EQUALVERIFY OP_CHECKSIG
    pub fn pkh() -> Self {
        Self(pkh_skeleton(&ScriptItem::Op(OP_PUBKEYHASH)))
    }

    /// OP_PUBKEY OP_CHECKSIG
    pub fn pk() -> Self {
        Self(pk_skeleton(&ScriptItem::Op(OP_PUBKEY)))
    }

    /**
        MultiPKH accumulator requiring `required` of `count` keys.
    */
    pub fn multi_pkh(required: u32, count: u32) -> Result<Self> {
        check_multi_pkh(required, count as usize)?;
        let slots = vec![ScriptItem::Op(OP_PUBKEYHASH); count as usize];
        Ok(Self(multi_pkh_skeleton(required, &slots)))
    }

    pub fn script(&self) -> &Script {
        &self.0
    }

    pub fn placeholder_count(&self) -> Result<usize> {
        let mut count = 0;
        for item in self.0.items() {
            if is_placeholder(&item?) {
                count += 1;
            }
        }
        Ok(count)
    }

    /**
        Replaces placeholders with the supplied keys in encounter order.
        Keys beyond the number of placeholders are ignored.
    */
    pub fn instantiate(&self, keys: &[PublicKey]) -> Result<Script> {
        let needed = self.placeholder_count()?;
        if needed > keys.len() {
            return Err(Error::NotEnoughPublicKeys { needed, got: keys.len() });
        }
        debug!(placeholders = needed, keys = keys.len(), "instantiating template");

        let got = keys.len();
        let mut keys = keys.iter();
        let mut b = Builder::new();
        for item in self.0.items() {
            b = match item? {
                ScriptItem::Op(OP_PUBKEY) => {
                    let key = keys.next().ok_or_else(|| Error::NotEnoughPublicKeys { needed, got })?;
                    b.push_data(&key.serialize())
                }
                ScriptItem::Op(OP_PUBKEYHASH) => {
                    let key = keys.next().ok_or_else(|| Error::NotEnoughPublicKeys { needed, got })?;
                    b.push_data(&key.hash160())
                }
                other => b.push_item(&other),
            };
        }
        Ok(b.into_script())
    }
}

fn is_placeholder(item: &ScriptItem) -> bool {
    matches!(item, ScriptItem::Op(OP_PUBKEY) | ScriptItem::Op(OP_PUBKEYHASH))
}

pub(crate) fn check_multi_pkh(required: u32, count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidMultiPkh("no keys".to_string()));
    }
    if required == 0 || required as usize > count {
        return Err(Error::InvalidMultiPkh(format!("{} of {}", required, count)));
    }
    Ok(())
}

pub(crate) fn pkh_skeleton(slot: &ScriptItem) -> Script {
    Builder::new()
        .push_opcode(OP_DUP)
        .push_opcode(OP_HASH160)
        .push_item(slot)
        .push_opcode(OP_EQUALVERIFY)
        .push_opcode(OP_CHECKSIG)
        .into_script()
}

pub(crate) fn pk_skeleton(slot: &ScriptItem) -> Script {
    Builder::new().push_item(slot).push_opcode(OP_CHECKSIG).into_script()
}

pub(crate) fn sh_script(hash: &[u8; 20]) -> Script {
    Builder::new()
        .push_opcode(OP_HASH160)
        .push_data(hash)
        .push_opcode(OP_EQUAL)
        .into_script()
}

/// Opcodes of the R-puzzle that cut R out of the signature and hash it
pub(crate) const RPH_PREFIX: [Opcode; 10] = [
    OP_DUP, OP_3, OP_SPLIT, OP_NIP, OP_1, OP_SPLIT, OP_SWAP, OP_SPLIT, OP_DROP, OP_HASH160,
];

pub(crate) fn rph_script(hash: &[u8; 20]) -> Script {
    RPH_PREFIX
        .iter()
        .fold(Builder::new(), |b, op| b.push_opcode(*op))
        .push_data(hash)
        .push_opcode(OP_EQUALVERIFY)
        .push_opcode(OP_SWAP)
        .push_opcode(OP_CHECKSIG)
        .into_script()
}

/// Opcodes following each key hash in the MultiPKH accumulator
pub(crate) const MULTI_PKH_KEY_SUFFIX: [Opcode; 6] = [
    OP_EQUALVERIFY,
    OP_CHECKSIGVERIFY,
    OP_FROMALTSTACK,
    OP_1ADD,
    OP_TOALTSTACK,
    OP_ENDIF,
];

/**
    OP_FALSE OP_TOALTSTACK
    { OP_IF OP_DUP OP_HASH160 <slot> OP_EQUALVERIFY OP_CHECKSIGVERIFY
      OP_FROMALTSTACK OP_1ADD OP_TOALTSTACK OP_ENDIF } per key
    <required> OP_FROMALTSTACK OP_LESSTHANOREQUAL
*/
pub(crate) fn multi_pkh_skeleton(required: u32, slots: &[ScriptItem]) -> Script {
    let mut b = Builder::new()
        .push_opcode(OP_FALSE)
        .push_opcode(OP_TOALTSTACK);
    for slot in slots {
        b = b
            .push_opcode(OP_IF)
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_item(slot);
        b = MULTI_PKH_KEY_SUFFIX.iter().fold(b, |b, op| b.push_opcode(*op));
    }
    b.push_number(required as i64)
        .push_opcode(OP_FROMALTSTACK)
        .push_opcode(OP_LESSTHANOREQUAL)
        .into_script()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{key::Key, network::Network};

    #[test]
    fn pkh_template() -> Result<()> {
        let t = Template::pkh();
        assert_eq!(t.script().to_asm()?, "OP_DUP OP_HASH160 OP_PUBKEYHASH OP_EQUALVERIFY OP_CHECKSIG");
        assert_eq!(t.placeholder_count()?, 1);

        let k = Key::generate(Network::MainNet);
        assert_eq!(t.instantiate(&[k.public_key()])?, k.locking_script());
        Ok(())
    }

    #[test]
    fn placeholders_fill_in_order() -> Result<()> {
        let t = Template::from_asm("OP_PUBKEY OP_CHECKSIGVERIFY OP_DUP OP_HASH160 OP_PUBKEYHASH OP_EQUALVERIFY OP_CHECKSIG")?;
        let a = Key::generate(Network::MainNet).public_key();
        let b = Key::generate(Network::MainNet).public_key();
        let s = t.instantiate(&[a, b])?;
        let expected = format!(
            "{} OP_CHECKSIGVERIFY OP_DUP OP_HASH160 {} OP_EQUALVERIFY OP_CHECKSIG",
            hex::encode(a.serialize()),
            hex::encode(b.hash160())
        );
        assert_eq!(s.to_asm()?, expected);
        Ok(())
    }

    #[test]
    fn not_enough_keys() -> Result<()> {
        let t = Template::multi_pkh(2, 3)?;
        assert_eq!(t.placeholder_count()?, 3);
        let keys: Vec<PublicKey> = (0..2).map(|_| Key::generate(Network::MainNet).public_key()).collect();
        assert!(matches!(
            t.instantiate(&keys),
            Err(Error::NotEnoughPublicKeys { needed: 3, got: 2 })
        ));
        Ok(())
    }

    #[test]
    fn multi_pkh_bounds() {
        assert!(Template::multi_pkh(0, 2).is_err());
        assert!(Template::multi_pkh(3, 2).is_err());
        assert!(Template::multi_pkh(1, 0).is_err());
        assert!(Template::multi_pkh(2, 2).is_ok());
    }

    #[test]
    fn multi_pkh_layout() -> Result<()> {
        let t = Template::multi_pkh(1, 1)?;
        assert_eq!(
            t.script().to_asm()?,
            "0 OP_TOALTSTACK OP_IF OP_DUP OP_HASH160 OP_PUBKEYHASH OP_EQUALVERIFY OP_CHECKSIGVERIFY \
             OP_FROMALTSTACK OP_1ADD OP_TOALTSTACK OP_ENDIF OP_1 OP_FROMALTSTACK OP_LESSTHANOREQUAL"
        );
        Ok(())
    }
}
