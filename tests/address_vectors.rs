//! Address encodings and locking script classification

use btc_keyscript::prelude::*;

const PKH_HASH: &str = "4974a24418c676add75fc291fccf3e2253ceb21d";
const PKH_ADDRESS: &str = "17hQ3sDD7yPNZ6Yjx4vMbkw5a14MhBf4wm";

#[test]
fn test_pkh_vector() -> Result<()> {
    let raw = RawAddress::from_bytes(&hex::decode(format!("20{}", PKH_HASH))?)?;
    let address = Address::new(raw.clone(), Network::MainNet)?;
    assert_eq!(address.to_string(), PKH_ADDRESS);

    let parsed: Address = PKH_ADDRESS.parse()?;
    assert_eq!(parsed.raw(), &raw);
    assert_eq!(parsed.network(), Network::MainNet);
    assert_eq!(
        parsed.locking_script().to_asm()?,
        format!("OP_DUP OP_HASH160 {} OP_EQUALVERIFY OP_CHECKSIG", PKH_HASH)
    );
    Ok(())
}

#[test]
fn test_generator_address() -> Result<()> {
    let mut scalar = [0u8; 32];
    scalar[31] = 1;
    let one = Key::from_bytes(&scalar, Network::MainNet)?;
    let address = Address::from_public_key(&one.public_key(), Network::MainNet);
    assert_eq!(address.to_string(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    Ok(())
}

#[test]
fn test_testnet_type_bytes() -> Result<()> {
    let raw = RawAddress::new_pkh([0u8; 20]);
    let main = Address::new(raw.clone(), Network::MainNet)?.to_string();
    let test = Address::new(raw, Network::TestNet)?.to_string();
    assert!(main.starts_with('1'));
    assert!(test.starts_with('m') || test.starts_with('n'));
    assert_eq!(test.parse::<Address>()?.network(), Network::TestNet);
    Ok(())
}

#[test]
fn test_classification() -> Result<()> {
    for _i in 0..5 {
        let keys: Vec<PublicKey> = (0..3).map(|_| Key::generate(Network::MainNet).public_key()).collect();
        let scripts = vec![
            Template::pkh().instantiate(&keys)?,
            Template::pk().instantiate(&keys)?,
            Template::multi_pkh(2, 3)?.instantiate(&keys)?,
            RawAddress::new_sh_from_script(&Template::pk().instantiate(&keys)?).locking_script(),
            RawAddress::new_rph(keys[0].hash160()).locking_script(),
        ];
        let expected = [ScriptType::Pkh, ScriptType::Pk, ScriptType::MultiPkh, ScriptType::Sh, ScriptType::Rph];
        for (script, st) in scripts.iter().zip(expected) {
            let raw = RawAddress::from_locking_script(script)?;
            assert_eq!(raw.script_type(), st);
            assert_eq!(&raw.locking_script(), script);

            let address = Address::from_locking_script(script, Network::TestNet)?;
            assert_eq!(&address.to_string().parse::<Address>()?.locking_script(), script);
        }
    }
    Ok(())
}

#[test]
fn test_non_standard_and_unspendable() -> Result<()> {
    let puzzle = Script::from_asm("OP_SHA256 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08 OP_EQUAL")?;
    let address = Address::from_locking_script(&puzzle, Network::MainNet)?;
    assert_eq!(address.script_type(), ScriptType::NonStandard);
    assert_eq!(address.to_string().parse::<Address>()?.locking_script(), puzzle);

    let data = Script::from_asm("OP_FALSE OP_RETURN 01020304")?;
    assert!(matches!(
        Address::from_locking_script(&data, Network::MainNet),
        Err(Error::UnknownScriptTemplate)
    ));

    //Empty scripts classify, but have no address
    assert_eq!(RawAddress::from_locking_script(&Script::default())?, RawAddress::empty());
    assert!(Address::from_locking_script(&Script::default(), Network::MainNet).is_err());
    Ok(())
}

#[test]
fn test_truncated_script() {
    let script: Script = "76a9140102".parse().unwrap();
    assert!(matches!(RawAddress::from_locking_script(&script), Err(Error::NotEnoughData)));
}

#[test]
fn test_rph_from_signature() -> Result<()> {
    let key = Key::generate(Network::MainNet);
    let sig = key.sign(&btc_keyscript::hash::sha256(b"puzzle"));
    let raw = RawAddress::rph_from_signature(&sig);
    let script = raw.locking_script();
    assert_eq!(RawAddress::from_locking_script(&script)?, raw);
    Ok(())
}
