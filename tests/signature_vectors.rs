//! Known answer tests for ECDSA signatures and signed messages

use btc_keyscript::hash;
use btc_keyscript::prelude::*;

const WIF: &str = "5Kff9dBYuPTbrkRDavBLf9RU5VLQ2d4XZBcBdGviP7ERNPfosc1";
const PUBLIC_KEY: &str = "02c8cae313edb1767eb95fee842931a49d7ee6df494e23edd684a97ad36d8942b4";
const DIGEST: &str = "bc62d4b80d9e36da29c16c5d4d9f11731f36052c72401a76c23c0fb5a9b74423";
const DER: &str = "3045022100f62c14e3ca07638e8e025278a3e49076432831b8c77a1e0c60cd0e5f1c9148c302201aeb803191e26b3a010da53ccf460b9a7d36df9a4b77d3255c7a04c8aa03e9cb";

const MESSAGE: &[u8] = b"hello world";
const MESSAGE_DIGEST: &str = "0b6b6ce07bc55ee4aeba0098a5e5d2c8986cab228a54199723f9962316633733";
const COMPACT: &str = "1f51e50adb7799510322d0991a7105fb73e7bff3c594835da94e5daeeb3149024259d1fad989afbef209b2789b15c0353e8b49fa1dd1a74d8696d87772e0d917df";
const COMPRESSED_ADDRESS: &str = "15rCr3FzhCwdDo8CHe4JDLunNUMyz6eVMQ";
const UNCOMPRESSED_ADDRESS: &str = "1GGHutDuwm6uyKJ2wu5ZkPL6Cg6EjPDkeH";

fn digest() -> [u8; 32] {
    let mut d = [0u8; 32];
    d.copy_from_slice(&hex::decode(DIGEST).unwrap());
    d
}

#[test]
fn test_deterministic_der_signature() -> Result<()> {
    let key = Key::from_wif(WIF)?;
    assert_eq!(key.public_key().to_string(), PUBLIC_KEY);
    assert_eq!(hash::double_sha256(MESSAGE), digest());

    let sig = key.sign(&digest());
    assert_eq!(hex::encode(sig.to_der()), DER);
    assert_eq!(key.sign(&digest()), sig);
    assert!(sig.is_low_s());
    Ok(())
}

#[test]
fn test_verify_parsed_signature() -> Result<()> {
    let public_key: PublicKey = PUBLIC_KEY.parse()?;
    let sig: Signature = DER.parse()?;
    assert!(public_key.verify(&digest(), &sig));

    let mut other = digest();
    other[0] ^= 0x01;
    assert!(!public_key.verify(&other, &sig));

    //The high-S twin still verifies
    let high = Signature::new(sig.r(), btc_keyscript::curve::negate_scalar(&sig.s()))?;
    assert!(!high.is_low_s());
    assert!(public_key.verify(&digest(), &high));
    assert_eq!(high.to_low_s(), sig);
    Ok(())
}

#[test]
fn test_signed_message() -> Result<()> {
    let key = Key::from_wif(WIF)?;
    assert_eq!(hex::encode(message_digest(MESSAGE)), MESSAGE_DIGEST);

    let sig = key.sign_message(MESSAGE);
    assert_eq!(sig.to_string(), COMPACT);
    assert!(sig.is_compressed());

    let address: Address = COMPRESSED_ADDRESS.parse()?;
    assert!(verify_message(MESSAGE, &sig, &address));
    assert!(!verify_message(b"hello world!", &sig, &address));
    Ok(())
}

#[test]
fn test_uncompressed_message_header() -> Result<()> {
    //Same signature with the uncompressed header byte
    let mut bytes = hex::decode(COMPACT)?;
    bytes[0] = 0x1b;
    let sig = CompactSignature::from_bytes(&bytes)?;
    assert!(!sig.is_compressed());

    let uncompressed: Address = UNCOMPRESSED_ADDRESS.parse()?;
    let compressed: Address = COMPRESSED_ADDRESS.parse()?;
    assert!(sig.verify_message(MESSAGE, &uncompressed));
    assert!(!sig.verify_message(MESSAGE, &compressed));
    Ok(())
}

#[test]
fn test_recovered_key() -> Result<()> {
    let sig: CompactSignature = COMPACT.parse()?;
    let mut d = [0u8; 32];
    d.copy_from_slice(&hex::decode(MESSAGE_DIGEST)?);
    assert_eq!(sig.recover(&d)?.to_string(), PUBLIC_KEY);
    assert_eq!(sig.recovery_id(), 0);
    Ok(())
}

#[test]
fn test_rejects_malformed_der() {
    //Extra leading zero on r
    assert!(matches!(
        "30270222000051e50adb7799510322d0991a7105fb73e7bff3c594835da94e5daeeb31490242020101".parse::<Signature>(),
        Err(Error::BadSignature(_))
    ));
    //Truncated
    assert!(DER[..DER.len() - 2].parse::<Signature>().is_err());
    assert!("".parse::<Signature>().is_err());
}
