/*
    This module implements hierarchical deterministic wallets
    under the BIP 32 standard.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki
*/

pub mod ckd;
pub mod extended_key;
pub mod extended_keys;
pub mod path;

pub use extended_key::{ExtendedKey, KeyMaterial};
pub use extended_keys::ExtendedKeys;
pub use path::{ChildIndex, Path, HARDENED_OFFSET};
