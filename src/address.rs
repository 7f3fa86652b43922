/*
    Addresses.

    An address is a raw address bound to a network:
        Base58Check( [address type byte][raw address payload] )
    The address type byte encodes both the network and the script type.
*/

use crate::{
    encoding::base58,
    error::{Error, Result},
    network::Network,
    public_key::PublicKey,
    raw_address::{RawAddress, ScriptType},
    script::Script,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    raw: RawAddress,
    network: Network,
    //Address type byte, fixed by the constructors
    version: u8,
}

impl Address {
    /**
        Binds a raw address to a network. Empty raw addresses have no
        address form.
    */
    pub fn new(raw: RawAddress, network: Network) -> Result<Self> {
        let version = network
            .address_type(raw.script_type())
            .ok_or_else(|| Error::UnknownScriptType(raw.script_type().to_u8()))?;
        Ok(Self { raw, network, version })
    }

    /**
        Creates a PKH address from a public key.
        * Base58Check( version | Ripemd160( Sha256( Public Key ) ) )
    */
    pub fn from_public_key(pk: &PublicKey, network: Network) -> Self {
        let version = network.params().address_types.pkh;
        Self { raw: pk.raw_address(), network, version }
    }

    /// Creates a SH address paying to a redeem script
    pub fn from_script(redeem_script: &Script, network: Network) -> Self {
        let version = network.params().address_types.sh;
        Self { raw: RawAddress::new_sh_from_script(redeem_script), network, version }
    }

    pub fn raw(&self) -> &RawAddress {
        &self.raw
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn script_type(&self) -> ScriptType {
        self.raw.script_type()
    }

    pub fn locking_script(&self) -> Script {
        self.raw.locking_script()
    }

    pub fn from_locking_script(script: &Script, network: Network) -> Result<Self> {
        Self::new(RawAddress::from_locking_script(script)?, network)
    }

    /// Address type byte; encodes both the network and the script type
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn to_base58(&self) -> String {
        base58::check_encode(&[self.version], &self.raw.payload())
    }

    /**
        Decodes an address. The checksum is verified before the type byte or
        payload are looked at.
    */
    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = base58::check_decode(s)?;
        let (version, payload) = bytes.split_first().ok_or(Error::NotEnoughData)?;
        let (network, script_type) = Network::from_address_type(*version)?;
        Self::new(RawAddress::from_payload(script_type, payload)?, network)
    }

    /// Decodes an address and checks it belongs to `network`
    pub fn from_base58_for_network(s: &str, network: Network) -> Result<Self> {
        let address = Self::from_base58(s)?;
        if address.network != network {
            return Err(Error::WrongNetwork);
        }
        Ok(address)
    }

    /**
        Verifies that an address is valid by checking the checksum, type byte
        and payload
    */
    pub fn is_valid(address: &str) -> bool {
        Self::from_base58(address).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;

    const TEST_PUB_KEY_HEX: &str = "0204664c60ceabd82967055ccbd0f56a1585dfbd42032656efa501c463b16fbdfe";

    fn test_pub_key() -> PublicKey {
        PublicKey::from_bytes(&hex::decode(TEST_PUB_KEY_HEX).unwrap()).unwrap()
    }

    #[test]
    fn address_from_pub_key() {
        let address = Address::from_public_key(&test_pub_key(), Network::MainNet);
        assert_eq!(address.to_base58(), "124ERAK4SqHMNWXycHPautn5zDYRKr3b2E");
    }

    #[test]
    fn address_from_script() {
        let script = Script::new(vec![0x6a, 0x29, 0x05, 0x20, 0x03]);
        let address = Address::from_script(&script, Network::MainNet);
        assert_eq!(address.to_base58(), "33SjjXog5Tqm3kCYNGCQBH46gc48a4SUXn");
    }

    #[test]
    fn pkh_from_hash() -> Result<()> {
        let hash = hex::decode("4974a24418c676add75fc291fccf3e2253ceb21d")?;
        let raw = RawAddress::from_payload(ScriptType::Pkh, &hash)?;
        let address = Address::new(raw, Network::MainNet)?;
        assert_eq!(address.to_base58(), "17hQ3sDD7yPNZ6Yjx4vMbkw5a14MhBf4wm");
        Ok(())
    }

    #[test]
    fn testnet_address() -> Result<()> {
        let k = Key::from_wif("cNShtSaCAzPPSFgm5LiGUhkuyBhJyV4jQqYXP3asyXK9k8uhiZdx")?;
        let address = Address::from_public_key(&k.public_key(), k.network());
        assert_eq!(address.to_base58(), "msSJzRfQb2T3hvws3vRhqtK2Ao39cabEa2");
        Ok(())
    }

    #[test]
    fn decode_every_type() -> Result<()> {
        for _i in 0..5 {
            let k = Key::generate(Network::MainNet);
            let pk = k.public_key();
            let raws = vec![
                pk.raw_address(),
                pk.pk_raw_address(),
                RawAddress::new_sh(pk.hash160()),
                RawAddress::new_rph(pk.hash160()),
                RawAddress::new_multi_pkh(1, vec![pk.hash160(), [0x01; 20]])?,
                RawAddress::new_non_standard(Script::from_asm("OP_2 OP_2 OP_ADD")?)?,
            ];
            for network in Network::ALL {
                for raw in &raws {
                    let address = Address::new(raw.clone(), network)?;
                    let decoded = Address::from_base58(&address.to_base58())?;
                    assert_eq!(decoded, address);
                    assert_eq!(decoded.network(), network);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn empty_has_no_address() {
        assert!(Address::new(RawAddress::empty(), Network::MainNet).is_err());
    }

    #[test]
    fn invalid_addresses() {
        assert!(Address::is_valid("124ERAK4SqHMNWXycHPautn5zDYRKr3b2E"));
        assert!(matches!(
            Address::from_base58("124ERAK4SqHMNWXycHPautn5zDYRKr3b2F"),
            Err(Error::BadCheckSum)
        ));
        assert!(!Address::is_valid("0OIl"));
        //Valid checksum, unknown type byte
        let unknown = base58::check_encode(&[0x01], &[0u8; 20]);
        assert!(matches!(Address::from_base58(&unknown), Err(Error::UnknownAddressType(0x01))));
        //PKH type byte with a short hash
        let short = base58::check_encode(&[0x00], &[0u8; 19]);
        assert!(matches!(Address::from_base58(&short), Err(Error::BadScriptHashLength(19))));
    }

    #[test]
    fn network_check() {
        let address = Address::from_public_key(&test_pub_key(), Network::MainNet).to_base58();
        assert!(Address::from_base58_for_network(&address, Network::MainNet).is_ok());
        assert!(matches!(
            Address::from_base58_for_network(&address, Network::TestNet),
            Err(Error::WrongNetwork)
        ));
    }

    #[test]
    fn locking_script_round_trip() -> Result<()> {
        let address = Address::from_public_key(&test_pub_key(), Network::TestNet);
        let script = address.locking_script();
        assert_eq!(Address::from_locking_script(&script, Network::TestNet)?, address);
        Ok(())
    }

    #[test]
    fn type_byte_follows_constructor() -> Result<()> {
        let pk = test_pub_key();
        for network in Network::ALL {
            let params = network.params().address_types;
            assert_eq!(Address::from_public_key(&pk, network).version(), params.pkh);
            assert_eq!(Address::from_script(&Script::new(vec![0x51]), network).version(), params.sh);
            let raw = RawAddress::new_rph(pk.hash160());
            assert_eq!(Address::new(raw, network)?.version(), params.rph);
        }
        assert!(matches!(
            Address::new(RawAddress::empty(), Network::MainNet),
            Err(Error::UnknownScriptType(0xff))
        ));
        Ok(())
    }

    #[test]
    fn standard_script_under_non_standard_type() {
        //A PKH script must only have the PKH address
        let pkh = RawAddress::new_pkh([0x11; 20]);
        let non_standard = Network::MainNet.params().address_types.non_standard;
        let smuggled = base58::check_encode(&[non_standard], pkh.locking_script().as_bytes());
        assert!(matches!(Address::from_base58(&smuggled), Err(Error::UnknownScriptTemplate)));
        assert!(!Address::is_valid(&smuggled));
    }
}
