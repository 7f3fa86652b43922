/*
    Public keys.

    A public key is a point on secp256k1, always rendered in the 33 byte
    compressed form 0x02|0x03 + X. Decompression (recovering Y from X through
    the curve equation and the parity byte) is done by libsecp256k1.
*/

use secp256k1::{PublicKey as Point, Scalar};

use crate::{
    curve,
    error::{Error, Result},
    hash,
    raw_address::RawAddress,
    signature::Signature,
};

pub const COMPRESSED_LEN: usize = 33;
pub const UNCOMPRESSED_LEN: usize = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(Point);

impl PublicKey {
    /**
        Parses a compressed (33 byte) or uncompressed (65 byte) point.
        An X coordinate with no square root on the curve, or a zero
        coordinate, is rejected with `InvalidPoint`.
    */
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            COMPRESSED_LEN | UNCOMPRESSED_LEN => {}
            n => return Err(Error::InvalidLength { expected: COMPRESSED_LEN, got: n }),
        }
        //x = 0 is the point at infinity sentinel
        if bytes[1..33].iter().all(|b| *b == 0) {
            return Err(Error::InvalidPoint);
        }
        let point = Point::from_slice(bytes).map_err(|_| Error::InvalidPoint)?;
        Ok(Self(point))
    }

    pub fn serialize(&self) -> [u8; COMPRESSED_LEN] {
        self.0.serialize()
    }

    pub fn serialize_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        self.0.serialize_uncompressed()
    }

    /// Hash160 of the compressed encoding
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(self.serialize())
    }

    pub(crate) fn point(&self) -> Point {
        self.0
    }

    /**
        Additive tweak P + h·G. Fails with `OutOfRangeKey` when h is not
        below N or the result is the point at infinity.
    */
    pub fn add_hash(&self, hash: &[u8; 32]) -> Result<Self> {
        let tweak = Scalar::from_be_bytes(*hash).map_err(|_| Error::OutOfRangeKey)?;
        let point = self
            .0
            .add_exp_tweak(curve::context(), &tweak)
            .map_err(|_| Error::OutOfRangeKey)?;
        Ok(Self(point))
    }

    /// Point addition
    pub fn combine(&self, other: &PublicKey) -> Result<Self> {
        Ok(Self(self.0.combine(&other.0).map_err(|_| Error::OutOfRangeKey)?))
    }

    pub fn verify(&self, digest: &[u8; 32], sig: &Signature) -> bool {
        sig.verify(digest, self)
    }

    /// PKH raw address
    pub fn raw_address(&self) -> RawAddress {
        RawAddress::new_pkh(self.hash160())
    }

    /// PK raw address, locking directly to this key
    pub fn pk_raw_address(&self) -> RawAddress {
        RawAddress::new_pk(self)
    }
}

impl From<Point> for PublicKey {
    fn from(point: Point) -> Self {
        Self(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{key::Key, network::Network};

    const TEST_PUB_KEY_HEX: &str = "0204664c60ceabd82967055ccbd0f56a1585dfbd42032656efa501c463b16fbdfe";

    #[test]
    fn compressed_round_trip() -> Result<()> {
        for _i in 0..5 {
            let pk = Key::generate(Network::MainNet).public_key();
            let bytes = pk.serialize();
            assert!(bytes[0] == 0x02 || bytes[0] == 0x03);
            assert_eq!(PublicKey::from_bytes(&bytes)?, pk);
            assert_eq!(PublicKey::from_bytes(&pk.serialize_uncompressed())?, pk);
        }
        Ok(())
    }

    #[test]
    fn decompression_selects_parity() -> Result<()> {
        let pk = PublicKey::from_bytes(&hex::decode(TEST_PUB_KEY_HEX)?)?;
        let full = pk.serialize_uncompressed();
        assert_eq!(full[0], 0x04);
        //even Y for a 0x02 prefix
        assert_eq!(full[64] & 1, 0);
        assert_eq!(&full[1..33], &pk.serialize()[1..]);

        let mut odd = pk.serialize();
        odd[0] = 0x03;
        let flipped = PublicKey::from_bytes(&odd)?;
        assert_eq!(flipped.serialize_uncompressed()[64] & 1, 1);
        Ok(())
    }

    #[test]
    fn invalid_points() {
        let mut zero = [0u8; 33];
        zero[0] = 0x02;
        assert!(matches!(PublicKey::from_bytes(&zero), Err(Error::InvalidPoint)));

        //x = 5 is not on secp256k1 (5³ + 7 = 132 is a non-residue)
        let mut off_curve = [0u8; 33];
        off_curve[0] = 0x02;
        off_curve[32] = 0x05;
        assert!(matches!(PublicKey::from_bytes(&off_curve), Err(Error::InvalidPoint)));

        assert!(matches!(PublicKey::from_bytes(&[0x02; 20]), Err(Error::InvalidLength { .. })));
    }

    #[test]
    fn hash160_of_generator() {
        let g = PublicKey::from_bytes(&curve::CURVE.generator).unwrap();
        assert_eq!(hex::encode(g.hash160()), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn combine_is_key_addition() -> Result<()> {
        let a = Key::generate(Network::MainNet);
        let b = Key::generate(Network::MainNet);
        let sum = a.add_hash(&b.bytes())?;
        assert_eq!(a.public_key().combine(&b.public_key())?, sum.public_key());
        Ok(())
    }
}
