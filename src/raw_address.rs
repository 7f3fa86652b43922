/*
    Raw addresses.

    A raw address is what a locking script pays to, without any network:
    a script type plus the payload needed to rebuild the script.

    Byte form: [script type][payload]
        PKH, SH, RPH   20 byte hash
        PK             33 byte compressed public key
        MultiPKH       varint(required) varint(count) count * 20 byte hash
        NonStandard    the script itself
        Empty          nothing (type byte 0xff)

    Classification rebuilds the script from the matched template and only
    keeps the match when the bytes are identical, so a raw address always
    renders back to the exact script it came from.
*/

use tracing::{debug, trace};

use crate::{
    encoding::{varint, Reader},
    error::{Error, Result},
    hash::{self, HASH160_LEN},
    public_key::{PublicKey, COMPRESSED_LEN},
    script::{
        opcodes::*,
        template::{self, MULTI_PKH_KEY_SUFFIX, RPH_PREFIX},
        Script, ScriptItem,
    },
    signature::Signature,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    Pkh,
    Sh,
    MultiPkh,
    Rph,
    Pk,
    NonStandard,
    Empty,
}

impl ScriptType {
    /// Every script type that has an address form
    pub const ADDRESSABLE: [ScriptType; 6] = [
        ScriptType::Pkh,
        ScriptType::Sh,
        ScriptType::MultiPkh,
        ScriptType::Rph,
        ScriptType::Pk,
        ScriptType::NonStandard,
    ];

    pub fn to_u8(self) -> u8 {
        match self {
            ScriptType::Pkh => 0x20,
            ScriptType::Sh => 0x21,
            ScriptType::MultiPkh => 0x22,
            ScriptType::Rph => 0x23,
            ScriptType::Pk => 0x24,
            ScriptType::NonStandard => 0x25,
            ScriptType::Empty => 0xff,
        }
    }

    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x20 => Ok(ScriptType::Pkh),
            0x21 => Ok(ScriptType::Sh),
            0x22 => Ok(ScriptType::MultiPkh),
            0x23 => Ok(ScriptType::Rph),
            0x24 => Ok(ScriptType::Pk),
            0x25 => Ok(ScriptType::NonStandard),
            0xff => Ok(ScriptType::Empty),
            b => Err(Error::UnknownScriptType(b)),
        }
    }
}

/**
    Threshold of key hashes: at least `required` of the keys must sign.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiPkh {
    required: u32,
    hashes: Vec<[u8; HASH160_LEN]>,
}

impl MultiPkh {
    pub fn new(required: u32, hashes: Vec<[u8; HASH160_LEN]>) -> Result<Self> {
        template::check_multi_pkh(required, hashes.len())?;
        Ok(Self { required, hashes })
    }

    pub fn from_public_keys(required: u32, keys: &[PublicKey]) -> Result<Self> {
        Self::new(required, keys.iter().map(|k| k.hash160()).collect())
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn hashes(&self) -> &[[u8; HASH160_LEN]] {
        &self.hashes
    }

    pub fn count(&self) -> usize {
        self.hashes.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.hashes.len() * HASH160_LEN);
        varint::write_base128(&mut out, self.required as u64);
        varint::write_base128(&mut out, self.hashes.len() as u64);
        for h in &self.hashes {
            out.extend_from_slice(h);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let required = u32::try_from(varint::read_base128(&mut r)?)
            .map_err(|_| Error::InvalidMultiPkh("required count too large".to_string()))?;
        let count = varint::read_base128(&mut r)?;
        //The hashes must all be present before anything is allocated for them
        if count.saturating_mul(HASH160_LEN as u64) != r.remaining() as u64 {
            return Err(Error::InvalidLength {
                expected: r.position() + (count as usize).saturating_mul(HASH160_LEN),
                got: bytes.len(),
            });
        }
        let mut hashes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            hashes.push(r.read_array::<HASH160_LEN>()?);
        }
        r.finish()?;
        Self::new(required, hashes)
    }

    fn locking_script(&self) -> Script {
        let slots: Vec<ScriptItem> = self
            .hashes
            .iter()
            .map(|h| ScriptItem::PushData(h.to_vec()))
            .collect();
        template::multi_pkh_skeleton(self.required, &slots)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawAddress {
    Pkh([u8; HASH160_LEN]),
    Sh([u8; HASH160_LEN]),
    MultiPkh(MultiPkh),
    Rph([u8; HASH160_LEN]),
    Pk(PublicKey),
    NonStandard(Script),
    Empty,
}

impl RawAddress {
    pub fn new_pkh(hash: [u8; HASH160_LEN]) -> Self {
        RawAddress::Pkh(hash)
    }

    pub fn new_sh(hash: [u8; HASH160_LEN]) -> Self {
        RawAddress::Sh(hash)
    }

    /// SH raw address paying to the hash160 of a redeem script
    pub fn new_sh_from_script(redeem_script: &Script) -> Self {
        RawAddress::Sh(redeem_script.hash160())
    }

    pub fn new_rph(hash: [u8; HASH160_LEN]) -> Self {
        RawAddress::Rph(hash)
    }

    /**
        R-puzzle paying to whoever can produce a signature with the same R,
        that is whoever knows the nonce behind it.
    */
    pub fn rph_from_signature(sig: &Signature) -> Self {
        RawAddress::Rph(hash::hash160(sig.r_der()))
    }

    pub fn new_pk(public_key: &PublicKey) -> Self {
        RawAddress::Pk(*public_key)
    }

    pub fn new_multi_pkh(required: u32, hashes: Vec<[u8; HASH160_LEN]>) -> Result<Self> {
        Ok(RawAddress::MultiPkh(MultiPkh::new(required, hashes)?))
    }

    /**
        Wraps a script that matches no template. Scripts that classify as
        anything else are rejected, so every script has a single raw address.
    */
    pub fn new_non_standard(script: Script) -> Result<Self> {
        match Self::from_locking_script(&script)? {
            raw @ RawAddress::NonStandard(_) => Ok(raw),
            _ => Err(Error::UnknownScriptTemplate),
        }
    }

    pub fn empty() -> Self {
        RawAddress::Empty
    }

    pub fn script_type(&self) -> ScriptType {
        match self {
            RawAddress::Pkh(_) => ScriptType::Pkh,
            RawAddress::Sh(_) => ScriptType::Sh,
            RawAddress::MultiPkh(_) => ScriptType::MultiPkh,
            RawAddress::Rph(_) => ScriptType::Rph,
            RawAddress::Pk(_) => ScriptType::Pk,
            RawAddress::NonStandard(_) => ScriptType::NonStandard,
            RawAddress::Empty => ScriptType::Empty,
        }
    }

    /// Hash paid to by PKH, SH and RPH addresses
    pub fn hash(&self) -> Option<[u8; HASH160_LEN]> {
        match self {
            RawAddress::Pkh(h) | RawAddress::Sh(h) | RawAddress::Rph(h) => Some(*h),
            _ => None,
        }
    }

    pub fn multi_pkh(&self) -> Option<&MultiPkh> {
        match self {
            RawAddress::MultiPkh(m) => Some(m),
            _ => None,
        }
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        match self {
            RawAddress::Pk(pk) => Some(pk),
            _ => None,
        }
    }

    /// Type specific payload, without the script type byte
    pub fn payload(&self) -> Vec<u8> {
        match self {
            RawAddress::Pkh(h) | RawAddress::Sh(h) | RawAddress::Rph(h) => h.to_vec(),
            RawAddress::Pk(pk) => pk.serialize().to_vec(),
            RawAddress::MultiPkh(m) => m.to_bytes(),
            RawAddress::NonStandard(s) => s.as_bytes().to_vec(),
            RawAddress::Empty => vec![],
        }
    }

    pub fn from_payload(script_type: ScriptType, payload: &[u8]) -> Result<Self> {
        let hash = || -> Result<[u8; HASH160_LEN]> {
            if payload.len() != HASH160_LEN {
                return Err(Error::BadScriptHashLength(payload.len()));
            }
            let mut h = [0u8; HASH160_LEN];
            h.copy_from_slice(payload);
            Ok(h)
        };
        Ok(match script_type {
            ScriptType::Pkh => RawAddress::Pkh(hash()?),
            ScriptType::Sh => RawAddress::Sh(hash()?),
            ScriptType::Rph => RawAddress::Rph(hash()?),
            ScriptType::Pk => {
                if payload.len() != COMPRESSED_LEN {
                    return Err(Error::InvalidLength { expected: COMPRESSED_LEN, got: payload.len() });
                }
                RawAddress::Pk(PublicKey::from_bytes(payload)?)
            }
            ScriptType::MultiPkh => RawAddress::MultiPkh(MultiPkh::from_bytes(payload)?),
            ScriptType::NonStandard => Self::new_non_standard(Script::new(payload.to_vec()))?,
            ScriptType::Empty => {
                if !payload.is_empty() {
                    return Err(Error::InvalidLength { expected: 0, got: payload.len() });
                }
                RawAddress::Empty
            }
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.script_type().to_u8()];
        out.extend_from_slice(&self.payload());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (type_byte, payload) = bytes.split_first().ok_or(Error::NotEnoughData)?;
        Self::from_payload(ScriptType::from_u8(*type_byte)?, payload)
    }

    /**
        Rebuilds the locking script this raw address stands for.
    */
    pub fn locking_script(&self) -> Script {
        match self {
            RawAddress::Pkh(h) => template::pkh_skeleton(&ScriptItem::PushData(h.to_vec())),
            RawAddress::Sh(h) => template::sh_script(h),
            RawAddress::Rph(h) => template::rph_script(h),
            RawAddress::Pk(pk) => template::pk_skeleton(&ScriptItem::PushData(pk.serialize().to_vec())),
            RawAddress::MultiPkh(m) => m.locking_script(),
            RawAddress::NonStandard(s) => s.clone(),
            RawAddress::Empty => Script::default(),
        }
    }

    /**
        Classifies a locking script.

        Empty scripts give the Empty raw address. Scripts starting with
        OP_RETURN or OP_FALSE OP_RETURN fail with `UnknownScriptTemplate`,
        a truncated push fails with `NotEnoughData`, and anything else that
        matches no template is kept verbatim as NonStandard.
    */
    pub fn from_locking_script(script: &Script) -> Result<Self> {
        if script.is_empty() {
            return Ok(RawAddress::Empty);
        }
        //Data after OP_RETURN need not parse
        if script.is_provably_unspendable() {
            return Err(Error::UnknownScriptTemplate);
        }
        let items = script.parse()?;
        if let Some(raw) = match_template(&items) {
            if raw.locking_script() == *script {
                return Ok(raw);
            }
            trace!(script_type = ?raw.script_type(), "template matched with non-minimal pushes");
        }
        debug!(len = script.len(), "script matches no template, keeping it as non-standard");
        Ok(RawAddress::NonStandard(script.clone()))
    }
}

fn to_hash(data: &[u8]) -> Option<[u8; HASH160_LEN]> {
    if data.len() != HASH160_LEN {
        return None;
    }
    let mut h = [0u8; HASH160_LEN];
    h.copy_from_slice(data);
    Some(h)
}

fn ops_match(items: &[ScriptItem], ops: &[Opcode]) -> bool {
    items.len() == ops.len() && items.iter().zip(ops).all(|(item, op)| *item == ScriptItem::Op(*op))
}

fn match_template(items: &[ScriptItem]) -> Option<RawAddress> {
    use ScriptItem::{Op, PushData};

    match items {
        [Op(OP_DUP), Op(OP_HASH160), PushData(h), Op(OP_EQUALVERIFY), Op(OP_CHECKSIG)] => {
            to_hash(h).map(RawAddress::Pkh)
        }
        [PushData(k), Op(OP_CHECKSIG)] if k.len() == COMPRESSED_LEN => {
            PublicKey::from_bytes(k).ok().map(RawAddress::Pk)
        }
        [Op(OP_HASH160), PushData(h), Op(OP_EQUAL)] => to_hash(h).map(RawAddress::Sh),
        [prefix @ .., PushData(h), Op(OP_EQUALVERIFY), Op(OP_SWAP), Op(OP_CHECKSIG)]
            if ops_match(prefix, &RPH_PREFIX) =>
        {
            to_hash(h).map(RawAddress::Rph)
        }
        [Op(OP_FALSE), Op(OP_TOALTSTACK), body @ ..] => match_multi_pkh(body),
        _ => None,
    }
}

/// The accumulator after OP_FALSE OP_TOALTSTACK
fn match_multi_pkh(body: &[ScriptItem]) -> Option<RawAddress> {
    let (keys, tail) = body.split_at(body.len().checked_sub(3)?);
    let required = match tail {
        [required, ScriptItem::Op(OP_FROMALTSTACK), ScriptItem::Op(OP_LESSTHANOREQUAL)] => {
            u32::try_from(required.as_number()?).ok()?
        }
        _ => return None,
    };
    if keys.len() % 10 != 0 {
        return None;
    }
    let mut hashes = Vec::with_capacity(keys.len() / 10);
    for chunk in keys.chunks(10) {
        match chunk {
            [ScriptItem::Op(OP_IF), ScriptItem::Op(OP_DUP), ScriptItem::Op(OP_HASH160), ScriptItem::PushData(h), suffix @ ..]
                if ops_match(suffix, &MULTI_PKH_KEY_SUFFIX) =>
            {
                hashes.push(to_hash(h)?)
            }
            _ => return None,
        }
    }
    MultiPkh::new(required, hashes).ok().map(RawAddress::MultiPkh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{key::Key, network::Network};

    fn random_hash() -> [u8; 20] {
        Key::generate(Network::MainNet).public_key().hash160()
    }

    #[test]
    fn script_type_bytes() -> Result<()> {
        for st in ScriptType::ADDRESSABLE {
            assert_eq!(ScriptType::from_u8(st.to_u8())?, st);
        }
        assert_eq!(ScriptType::from_u8(0xff)?, ScriptType::Empty);
        assert!(matches!(ScriptType::from_u8(0x26), Err(Error::UnknownScriptType(0x26))));
        Ok(())
    }

    #[test]
    fn standard_scripts_round_trip() -> Result<()> {
        for _i in 0..5 {
            let pk = Key::generate(Network::MainNet).public_key();
            let hashes: Vec<[u8; 20]> = (0..3).map(|_| random_hash()).collect();
            let raws = vec![
                RawAddress::new_pkh(pk.hash160()),
                RawAddress::new_pk(&pk),
                RawAddress::new_sh(random_hash()),
                RawAddress::new_rph(random_hash()),
                RawAddress::new_multi_pkh(2, hashes)?,
            ];
            for raw in raws {
                let script = raw.locking_script();
                let classified = RawAddress::from_locking_script(&script)?;
                assert_eq!(classified, raw);
                assert_eq!(classified.locking_script(), script);
                assert_eq!(RawAddress::from_bytes(&raw.to_bytes())?, raw);
            }
        }
        Ok(())
    }

    #[test]
    fn pkh_script_layout() -> Result<()> {
        let h = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6")?;
        let raw = RawAddress::from_payload(ScriptType::Pkh, &h)?;
        assert_eq!(
            hex::encode(raw.locking_script().as_bytes()),
            "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac"
        );
        Ok(())
    }

    #[test]
    fn rph_script_layout() -> Result<()> {
        let raw = RawAddress::new_rph([0x11; 20]);
        assert_eq!(
            raw.locking_script().to_asm()?,
            format!(
                "OP_DUP OP_3 OP_SPLIT OP_NIP OP_1 OP_SPLIT OP_SWAP OP_SPLIT OP_DROP OP_HASH160 {} OP_EQUALVERIFY OP_SWAP OP_CHECKSIG",
                hex::encode([0x11; 20])
            )
        );
        Ok(())
    }

    #[test]
    fn rph_from_signature_hashes_der_r() {
        let k = Key::generate(Network::MainNet);
        let sig = k.sign(&hash::sha256(b"r puzzle"));
        let raw = RawAddress::rph_from_signature(&sig);
        assert_eq!(raw.hash(), Some(hash::hash160(sig.r_der())));
    }

    #[test]
    fn multi_pkh_with_large_required() -> Result<()> {
        let hashes: Vec<[u8; 20]> = (0..20).map(|_| random_hash()).collect();
        let raw = RawAddress::new_multi_pkh(17, hashes)?;
        let script = raw.locking_script();
        //17 does not fit OP_1..OP_16, it is pushed as a one byte number
        let tail = &script.as_bytes()[script.len() - 4..];
        assert_eq!(tail, &[0x01, 0x11, 0x6c, 0xa1]);
        assert_eq!(RawAddress::from_locking_script(&script)?, raw);
        Ok(())
    }

    #[test]
    fn multi_pkh_out_of_range_is_non_standard() -> Result<()> {
        let m = MultiPkh::new(1, vec![[0x22; 20], [0x33; 20]])?;
        let mut bytes = m.locking_script().into_bytes();
        //Swap OP_1 for OP_3, more than the two keys present
        let at = bytes.len() - 3;
        assert_eq!(bytes[at], 0x51);
        bytes[at] = 0x53;
        let script = Script::new(bytes);
        assert_eq!(RawAddress::from_locking_script(&script)?, RawAddress::NonStandard(script.clone()));
        Ok(())
    }

    #[test]
    fn multi_pkh_payload() -> Result<()> {
        let m = MultiPkh::new(2, vec![[0xaa; 20], [0xbb; 20], [0xcc; 20]])?;
        let bytes = m.to_bytes();
        assert_eq!(&bytes[..2], &[0x02, 0x03]);
        assert_eq!(bytes.len(), 62);
        assert_eq!(MultiPkh::from_bytes(&bytes)?, m);

        //Count claims more hashes than there are
        assert!(MultiPkh::from_bytes(&[0x01, 0xff, 0xff, 0xff, 0xff, 0x0f]).is_err());
        assert!(MultiPkh::from_bytes(&bytes[..40]).is_err());
        assert!(matches!(MultiPkh::from_bytes(&[0x00, 0x00]), Err(Error::InvalidMultiPkh(_))));
        Ok(())
    }

    #[test]
    fn classification_policies() -> Result<()> {
        assert_eq!(RawAddress::from_locking_script(&Script::default())?, RawAddress::Empty);
        assert!(RawAddress::Empty.locking_script().is_empty());

        let data = Script::from_asm("OP_FALSE OP_RETURN 68656c6c6f")?;
        assert!(matches!(RawAddress::from_locking_script(&data), Err(Error::UnknownScriptTemplate)));
        let data = Script::from_asm("OP_RETURN 68656c6c6f")?;
        assert!(matches!(RawAddress::from_locking_script(&data), Err(Error::UnknownScriptTemplate)));

        let truncated = Script::new(vec![0x76, 0xa9, 0x14, 0x00]);
        assert!(matches!(RawAddress::from_locking_script(&truncated), Err(Error::NotEnoughData)));

        let odd = Script::from_asm("OP_2 OP_2 OP_ADD OP_4 OP_EQUAL")?;
        assert_eq!(RawAddress::from_locking_script(&odd)?, RawAddress::NonStandard(odd.clone()));
        Ok(())
    }

    #[test]
    fn unspendable_with_unparseable_data() {
        //The push claims 5 bytes but only 1 follows
        for bytes in [vec![0x00, 0x6a, 0x05, 0x01], vec![0x6a, 0x4c]] {
            let script = Script::new(bytes);
            assert!(matches!(RawAddress::from_locking_script(&script), Err(Error::UnknownScriptTemplate)));
        }
    }

    #[test]
    fn non_standard_rejects_classifiable_scripts() -> Result<()> {
        let pkh = RawAddress::new_pkh([0x11; 20]).locking_script();
        assert!(matches!(RawAddress::new_non_standard(pkh.clone()), Err(Error::UnknownScriptTemplate)));
        assert!(RawAddress::new_non_standard(Script::default()).is_err());
        assert!(RawAddress::new_non_standard(Script::from_asm("OP_RETURN 68656c6c6f")?).is_err());

        //Same script smuggled in through the non-standard type byte
        let mut bytes = vec![ScriptType::NonStandard.to_u8()];
        bytes.extend_from_slice(pkh.as_bytes());
        assert!(matches!(RawAddress::from_bytes(&bytes), Err(Error::UnknownScriptTemplate)));

        let odd = Script::from_asm("OP_2 OP_2 OP_ADD OP_4 OP_EQUAL")?;
        let raw = RawAddress::new_non_standard(odd.clone())?;
        assert_eq!(RawAddress::from_locking_script(&raw.locking_script())?, raw);
        Ok(())
    }

    #[test]
    fn non_minimal_push_is_non_standard() -> Result<()> {
        //PKH shape but the hash is pushed with OP_PUSHDATA1
        let mut bytes = vec![0x76, 0xa9, 0x4c, 0x14];
        bytes.extend_from_slice(&[0x44; 20]);
        bytes.extend_from_slice(&[0x88, 0xac]);
        let script = Script::new(bytes);
        let raw = RawAddress::from_locking_script(&script)?;
        assert_eq!(raw.script_type(), ScriptType::NonStandard);
        assert_eq!(raw.locking_script(), script);
        Ok(())
    }

    #[test]
    fn bad_payloads() {
        assert!(matches!(
            RawAddress::from_payload(ScriptType::Pkh, &[0u8; 19]),
            Err(Error::BadScriptHashLength(19))
        ));
        assert!(matches!(RawAddress::from_bytes(&[]), Err(Error::NotEnoughData)));
        assert!(matches!(RawAddress::from_bytes(&[0x01, 0x02]), Err(Error::UnknownScriptType(0x01))));
        assert!(RawAddress::from_bytes(&[0xff, 0x00]).is_err());
    }
}
