/*
    secp256k1 curve parameters and scalar helpers.

    Point arithmetic, nonce generation and signing run on the libsecp256k1
    bindings. This module holds the constants the encoders validate against
    and the big-endian scalar comparisons they need.
*/

use std::cmp::Ordering;

use secp256k1::{All, Secp256k1, SECP256K1};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParams {
    /// Field prime p, the curve is y² = x³ + 7 over F_p
    pub field_prime: [u8; 32],
    /// Group order N
    pub order: [u8; 32],
    /// floor(N / 2), the largest low-S value
    pub half_order: [u8; 32],
    /// Compressed generator point G
    pub generator: [u8; 33],
}

pub const CURVE: CurveParams = CurveParams {
    field_prime: [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
    ],
    order: secp256k1::constants::CURVE_ORDER,
    half_order: [
        0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d,
        0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
    ],
    generator: [
        0x02,
        0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac,
        0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b, 0x07,
        0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9,
        0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
    ],
};

/// Immutable signing and verification context
pub fn context() -> &'static Secp256k1<All> {
    SECP256K1
}

/// Compare two 32-byte big-endian integers
pub fn compare(a: &[u8; 32], b: &[u8; 32]) -> Ordering {
    a.iter().cmp(b.iter())
}

pub fn is_zero(a: &[u8; 32]) -> bool {
    a.iter().all(|b| *b == 0)
}

/// 0 < a < N
pub fn is_valid_scalar(a: &[u8; 32]) -> bool {
    !is_zero(a) && compare(a, &CURVE.order) == Ordering::Less
}

/// a <= N/2
pub fn is_low_s(a: &[u8; 32]) -> bool {
    compare(a, &CURVE.half_order) != Ordering::Greater
}

/**
    N - a, for 0 < a < N. Used to flip a high S into its low-S twin.
*/
pub fn negate_scalar(a: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut d = CURVE.order[i] as i16 - a[i] as i16 - borrow;
        if d < 0 {
            d += 256;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out[i] = d as u8;
    }
    out
}

/**
    Left-pads a big-endian integer of at most 32 bytes.
*/
pub fn to_scalar_bytes(be: &[u8]) -> Option<[u8; 32]> {
    if be.len() > 32 {
        return None;
    }
    let mut out = [0u8; 32];
    out[32 - be.len()..].copy_from_slice(be);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_order_doubles_to_order() {
        //2 * (N/2) + 1 == N
        let mut doubled = [0u8; 32];
        let mut carry = 1u16;
        for i in (0..32).rev() {
            let v = CURVE.half_order[i] as u16 * 2 + carry;
            doubled[i] = v as u8;
            carry = v >> 8;
        }
        assert_eq!(carry, 0);
        assert_eq!(doubled, CURVE.order);
    }

    #[test]
    fn scalar_range() {
        let mut one = [0u8; 32];
        one[31] = 1;
        assert!(is_valid_scalar(&one));
        assert!(!is_valid_scalar(&[0u8; 32]));
        assert!(!is_valid_scalar(&CURVE.order));
        assert!(!is_valid_scalar(&[0xff; 32]));

        let mut n_minus_one = CURVE.order;
        n_minus_one[31] -= 1;
        assert!(is_valid_scalar(&n_minus_one));
        assert_eq!(negate_scalar(&n_minus_one), one);
        assert!(!is_low_s(&n_minus_one));
        assert!(is_low_s(&one));
        assert!(is_low_s(&CURVE.half_order));
    }

    #[test]
    fn generator_matches_context() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let sk = secp256k1::SecretKey::from_slice(&one).unwrap();
        let g = secp256k1::PublicKey::from_secret_key(context(), &sk);
        assert_eq!(g.serialize(), CURVE.generator);
    }
}
