//! Error types shared by every module of the crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input ended before a complete value could be read
    #[error("not enough data")]
    NotEnoughData,

    #[error("invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("bad checksum")]
    BadCheckSum,

    /// Malformed DER or compact signature
    #[error("malformed signature: {0}")]
    BadSignature(&'static str),

    #[error("unknown wif suffix {0:#04x}")]
    UnknownWifSuffix(u8),

    #[error("bad recovery id {0}")]
    BadRecoveryId(u8),

    #[error("unknown script type {0:#04x}")]
    UnknownScriptType(u8),

    #[error("unknown address type {0:#04x}")]
    UnknownAddressType(u8),

    #[error("unknown network {0:#04x}")]
    UnknownNetwork(u8),

    #[error("unknown network name {0}")]
    UnknownNetworkName(String),

    #[error("unknown extended key version {0:02x?}")]
    UnknownVersion([u8; 4]),

    #[error("invalid bip276 encoding: {0}")]
    BadBip276(String),

    #[error("invalid derivation path: {0}")]
    BadPath(String),

    #[error("invalid script: {0}")]
    BadScript(String),

    #[error("wrong network")]
    WrongNetwork,

    #[error("base58 decoding error: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Scalar is zero or not below the curve order, or arithmetic left the valid range
    #[error("key out of range")]
    OutOfRangeKey,

    /// Bytes do not describe a point on the curve
    #[error("invalid point")]
    InvalidPoint,

    #[error("cannot derive hardened child from public key")]
    CannotDeriveHardenedFromPublic,

    #[error("extended key is not private")]
    NotPrivate,

    #[error("bad script hash length {0}")]
    BadScriptHashLength(usize),

    #[error("invalid multi-pkh: {0}")]
    InvalidMultiPkh(String),

    #[error("unknown script template")]
    UnknownScriptTemplate,

    #[error("not enough public keys: template needs {needed}, got {got}")]
    NotEnoughPublicKeys { needed: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
